#![forbid(unsafe_code)]

//! Forward change notifications from an optional observed object to a stable
//! render-trigger channel.
//!
//! # Design
//!
//! [`ObservationBridge<T>`] owns a [`RelayChannel`] for its whole lifetime and
//! at most one [`Subscription`] on the currently observed object's
//! will-change publisher. The host calls [`recompute()`](ObservationBridge::recompute)
//! before every render pass with whatever reference it currently holds; the
//! bridge cancels the previous subscription and, if a reference is present,
//! subscribes again with a callback that sends once on the relay.
//!
//! The forwarding callback captures only a [`WeakPublisher`](super::WeakPublisher)
//! to the relay. If the bridge is gone when the observed object sends, the
//! upgrade fails and the callback does nothing.
//!
//! Identity is `Rc` pointer identity. The bridge remembers the previous
//! reference as a `Weak<T>`, which pins the allocation so its address cannot
//! be reused by a different object while it is remembered.
//!
//! # Invariants
//!
//! 1. The relay never changes identity for the lifetime of the bridge.
//! 2. After `recompute(r)` returns, at most one forwarding subscription is
//!    live and it targets `r` (none when `r` is `None`).
//! 3. Each send on the observed publisher yields exactly one relay send.
//! 4. `recompute()` itself sends on the relay only when
//!    [`BridgeConfig::announce_replacement`] is set and the identity changed.
//!
//! # Failure Modes
//!
//! None. Absence is the empty state, and teardown is handled structurally.

use std::rc::{Rc, Weak};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use super::publisher::{ObservableObject, Subscription};
use super::relay::RelayChannel;
use crate::config::{BridgeConfig, ResubscribePolicy};

/// Counters describing what the bridge has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Calls to `recompute()`.
    pub recomputes: u64,
    /// Forwarding subscriptions created.
    pub subscriptions_created: u64,
    /// Forwarding subscriptions cancelled.
    pub subscriptions_cancelled: u64,
    /// Recomputes whose reference identity differed from the previous one.
    pub replacements: u64,
}

/// Keeps one forwarding subscription aligned with the observed reference.
pub struct ObservationBridge<T: ObservableObject + ?Sized> {
    relay: RelayChannel,
    subscription: Option<Subscription>,
    observed: Option<Weak<T>>,
    config: BridgeConfig,
    stats: BridgeStats,
}

impl<T: ObservableObject + ?Sized> std::fmt::Debug for ObservationBridge<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservationBridge")
            .field("relay", &self.relay)
            .field("observing", &self.is_observing())
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<T: ObservableObject + ?Sized> Default for ObservationBridge<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ObservableObject + ?Sized> ObservationBridge<T> {
    /// Create a bridge observing nothing, with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    /// Create a bridge observing nothing.
    #[must_use]
    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            relay: RelayChannel::new(),
            subscription: None,
            observed: None,
            config,
            stats: BridgeStats::default(),
        }
    }

    /// Align the forwarding subscription with `current`.
    ///
    /// Call once per render pass with the latest reference. Safe to call any
    /// number of times with the same reference.
    pub fn recompute(&mut self, current: Option<&Rc<T>>) {
        self.stats.recomputes += 1;
        let replaced = !same_identity(self.observed.as_ref(), current);

        #[cfg(feature = "tracing")]
        trace!(
            policy = self.config.resubscribe.as_str(),
            present = current.is_some(),
            replaced,
            "observation bridge: recompute"
        );

        let keep = !replaced
            && self.config.resubscribe == ResubscribePolicy::OnIdentityChange
            && (current.is_none() || self.subscription.is_some());
        if keep {
            return;
        }

        // Cancel before subscribing so the old object can never reach the relay
        // once this call returns.
        self.cancel_forwarding();
        if let Some(object) = current {
            self.subscription = Some(self.forward_from(object));
            self.stats.subscriptions_created += 1;

            #[cfg(feature = "tracing")]
            debug!(
                created = self.stats.subscriptions_created,
                "observation bridge: forwarding subscription created"
            );
        }
        self.observed = current.map(Rc::downgrade);

        if replaced {
            self.stats.replacements += 1;
            if self.config.announce_replacement {
                self.relay.send();
            }
        }
    }

    /// The render-trigger signal. Subscribe once per host lifetime.
    #[must_use]
    pub fn notifications(&self) -> &RelayChannel {
        &self.relay
    }

    /// Whether a forwarding subscription is live.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Whether the forwarding subscription targets `object`.
    #[must_use]
    pub fn is_observing_object(&self, object: &Rc<T>) -> bool {
        self.is_observing() && same_identity(self.observed.as_ref(), Some(object))
    }

    /// Total render triggers emitted, forwarded changes and announcements.
    #[must_use]
    pub fn relay_send_count(&self) -> u64 {
        self.relay.send_count()
    }

    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    fn forward_from(&self, object: &Rc<T>) -> Subscription {
        let relay = self.relay.downgrade();
        object.object_will_change().subscribe(move || match relay.upgrade() {
            Some(relay) => relay.send(),
            None => {
                #[cfg(feature = "tracing")]
                trace!("observation bridge: relay gone, change dropped");
            }
        })
    }

    fn cancel_forwarding(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            self.stats.subscriptions_cancelled += 1;

            #[cfg(feature = "tracing")]
            debug!(
                cancelled = self.stats.subscriptions_cancelled,
                "observation bridge: forwarding subscription cancelled"
            );
        }
    }
}

fn same_identity<T: ?Sized>(previous: Option<&Weak<T>>, current: Option<&Rc<T>>) -> bool {
    match (previous, current) {
        (None, None) => true,
        (Some(previous), Some(current)) => {
            std::ptr::addr_eq(previous.as_ptr(), Rc::as_ptr(current))
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{ChangePublisher, Published};
    use std::cell::Cell;

    struct Model {
        will_change: ChangePublisher,
        name: Published<String>,
    }

    impl Model {
        fn new(name: &str) -> Rc<Self> {
            let will_change = ChangePublisher::new();
            let name = Published::new(&will_change, name.to_string());
            Rc::new(Self { will_change, name })
        }
    }

    impl ObservableObject for Model {
        fn object_will_change(&self) -> &ChangePublisher {
            &self.will_change
        }
    }

    fn watch(bridge: &ObservationBridge<Model>) -> (Rc<Cell<u32>>, Subscription) {
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let sub = bridge
            .notifications()
            .subscribe(move || count_clone.set(count_clone.get() + 1));
        (count, sub)
    }

    #[test]
    fn forwards_each_change_once() {
        let mut bridge = ObservationBridge::new();
        let (renders, _sub) = watch(&bridge);
        let a = Model::new("Ann");

        bridge.recompute(Some(&a));
        a.name.set("Anna".into());
        assert_eq!(renders.get(), 1);
        a.will_change.send();
        assert_eq!(renders.get(), 2);
    }

    #[test]
    fn absent_reference_does_not_subscribe() {
        let mut bridge = ObservationBridge::<Model>::new();
        bridge.recompute(None);
        assert!(!bridge.is_observing());
        assert_eq!(bridge.stats().subscriptions_created, 0);
    }

    #[test]
    fn replacing_reference_drops_old_forwarding() {
        let mut bridge = ObservationBridge::new();
        let (renders, _sub) = watch(&bridge);
        let a = Model::new("Ann");
        let b = Model::new("Bo");

        bridge.recompute(Some(&a));
        bridge.recompute(Some(&b));
        a.name.set("x".into());
        assert_eq!(renders.get(), 0);
        assert_eq!(a.will_change.live_subscriber_count(), 0);

        b.name.set("y".into());
        assert_eq!(renders.get(), 1);
        assert!(bridge.is_observing_object(&b));
        assert!(!bridge.is_observing_object(&a));
    }

    #[test]
    fn repeated_recompute_never_double_subscribes() {
        for config in [BridgeConfig::default(), BridgeConfig::on_identity_change()] {
            let mut bridge = ObservationBridge::with_config(config);
            let (renders, _sub) = watch(&bridge);
            let a = Model::new("Ann");

            for _ in 0..5 {
                bridge.recompute(Some(&a));
            }
            assert_eq!(a.will_change.live_subscriber_count(), 1);

            a.will_change.send();
            assert_eq!(renders.get(), 1);
        }
    }

    #[test]
    fn render_loop_without_changes_keeps_one_slot() {
        for config in [BridgeConfig::default(), BridgeConfig::on_identity_change()] {
            let mut bridge = ObservationBridge::with_config(config);
            let a = Model::new("Ann");

            for _ in 0..10_000 {
                bridge.recompute(Some(&a));
            }
            assert_eq!(a.will_change.subscriber_count(), 1);
            assert_eq!(a.will_change.live_subscriber_count(), 1);
            assert_eq!(a.will_change.send_count(), 0);
        }
    }

    #[test]
    fn always_policy_recreates_subscription() {
        let mut bridge = ObservationBridge::new();
        let a = Model::new("Ann");
        bridge.recompute(Some(&a));
        bridge.recompute(Some(&a));
        bridge.recompute(Some(&a));

        let stats = bridge.stats();
        assert_eq!(stats.recomputes, 3);
        assert_eq!(stats.subscriptions_created, 3);
        assert_eq!(stats.subscriptions_cancelled, 2);
        assert_eq!(stats.replacements, 1);
    }

    #[test]
    fn identity_policy_keeps_subscription() {
        let mut bridge = ObservationBridge::with_config(BridgeConfig::on_identity_change());
        let a = Model::new("Ann");
        bridge.recompute(Some(&a));
        bridge.recompute(Some(&a));
        bridge.recompute(None);
        bridge.recompute(None);

        let stats = bridge.stats();
        assert_eq!(stats.subscriptions_created, 1);
        assert_eq!(stats.subscriptions_cancelled, 1);
        assert_eq!(stats.replacements, 2);
        assert!(!bridge.is_observing());
    }

    #[test]
    fn relay_identity_is_stable() {
        let mut bridge = ObservationBridge::new();
        let before: *const RelayChannel = bridge.notifications();
        let a = Model::new("Ann");
        bridge.recompute(Some(&a));
        bridge.recompute(None);
        assert!(std::ptr::eq(before, bridge.notifications()));
    }

    #[test]
    fn recompute_is_silent_by_default() {
        let mut bridge = ObservationBridge::new();
        let (renders, _sub) = watch(&bridge);
        let a = Model::new("Ann");
        bridge.recompute(Some(&a));
        bridge.recompute(None);
        bridge.recompute(Some(&a));
        assert_eq!(renders.get(), 0);
    }

    #[test]
    fn announce_replacement_fires_once_per_identity_change() {
        let config = BridgeConfig::default().with_announce_replacement(true);
        let mut bridge = ObservationBridge::with_config(config);
        let (renders, _sub) = watch(&bridge);
        let a = Model::new("Ann");
        let b = Model::new("Bo");

        bridge.recompute(None);
        assert_eq!(renders.get(), 0);
        bridge.recompute(Some(&a));
        bridge.recompute(Some(&a));
        assert_eq!(renders.get(), 1);
        bridge.recompute(Some(&b));
        assert_eq!(renders.get(), 2);
        bridge.recompute(None);
        bridge.recompute(None);
        assert_eq!(renders.get(), 3);
    }

    #[test]
    fn teardown_turns_forwarding_into_noop() {
        let a = Model::new("Ann");
        let renders = Rc::new(Cell::new(0u32));
        {
            let mut bridge = ObservationBridge::new();
            let renders_clone = Rc::clone(&renders);
            let _sub = bridge
                .notifications()
                .subscribe(move || renders_clone.set(renders_clone.get() + 1));
            bridge.recompute(Some(&a));
        }
        a.name.set("after".into());
        assert_eq!(renders.get(), 0);
        assert_eq!(a.name.get(), "after");
    }

    #[test]
    fn forwarding_after_relay_loss_is_noop() {
        // A forwarding callback outliving its relay must not panic.
        let a = Model::new("Ann");
        let bridge = ObservationBridge::<Model>::new();
        let sub = bridge.forward_from(&a);
        drop(bridge);
        a.will_change.send();
        assert!(sub.is_active());
    }

    #[test]
    fn recompute_from_render_callback() {
        // Hosts may recompute synchronously from inside the render trigger.
        let a = Model::new("Ann");
        let bridge = Rc::new(std::cell::RefCell::new(ObservationBridge::new()));
        bridge.borrow_mut().recompute(Some(&a));

        let renders = Rc::new(Cell::new(0u32));
        let weak_bridge = Rc::downgrade(&bridge);
        let a_clone = Rc::clone(&a);
        let renders_clone = Rc::clone(&renders);
        let _sub = bridge.borrow().notifications().subscribe(move || {
            renders_clone.set(renders_clone.get() + 1);
            if let Some(bridge) = weak_bridge.upgrade() {
                bridge.borrow_mut().recompute(Some(&a_clone));
            }
        });

        a.will_change.send();
        a.will_change.send();
        assert_eq!(renders.get(), 2);
        assert_eq!(a.will_change.live_subscriber_count(), 1);
    }

    #[test]
    fn trait_object_observation() {
        let a: Rc<dyn ObservableObject> = Model::new("Ann");
        let mut bridge = ObservationBridge::<dyn ObservableObject>::new();
        bridge.recompute(Some(&a));
        assert!(bridge.is_observing_object(&a));
        a.object_will_change().send();
        assert_eq!(bridge.relay_send_count(), 1);
    }
}
