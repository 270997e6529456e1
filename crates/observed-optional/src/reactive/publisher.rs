#![forbid(unsafe_code)]

//! Valueless will-change publisher with RAII subscriptions.
//!
//! # Design
//!
//! [`ChangePublisher`] keeps its subscriber list in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Each subscriber lives in a slot owned by the
//! [`Subscription`] guard; the publisher only holds `Weak` handles to the slots
//! and prunes dead ones during [`send()`](ChangePublisher::send) and
//! [`subscribe()`](ChangePublisher::subscribe).
//!
//! Domain objects embed a `ChangePublisher` and call `send()` *before* a
//! mutation becomes visible, which makes them [`ObservableObject`]s.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. A cancelled subscription never runs again, even when cancellation happens
//!    while a `send()` on the same publisher is still iterating.
//! 3. `send_count()` increments by exactly 1 per `send()`.
//! 4. Right after `subscribe()`, `subscriber_count()` equals the number of
//!    live guards, so cancel-and-resubscribe churn never grows the list.
//! 5. No borrow of the publisher is held while callbacks run, so callbacks may
//!    subscribe, cancel, or send re-entrantly.
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: if `Subscription` guards are stored indefinitely,
//!   callbacks accumulate. Dead slots are pruned on the next `send()` or
//!   `subscribe()`.
//! - **Unbounded re-entrancy**: a callback that unconditionally calls `send()`
//!   on its own publisher recurses until the stack overflows.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// A type whose instances announce changes before they become visible.
///
/// Implementors own a [`ChangePublisher`] and call
/// [`send()`](ChangePublisher::send) ahead of every externally visible
/// mutation. [`Published`](super::Published) fields do this automatically.
pub trait ObservableObject {
    /// The publisher that fires before each change.
    fn object_will_change(&self) -> &ChangePublisher;
}

/// A registered callback and its cancellation flag.
struct Slot {
    active: Cell<bool>,
    callback: Box<dyn Fn()>,
}

/// Shared interior for [`ChangePublisher`].
struct PublisherInner {
    /// Subscriber slots, owned by their `Subscription` guards.
    subscribers: Vec<Weak<Slot>>,
    sends: u64,
}

/// A shared notification source emitting discrete, valueless events.
///
/// Cloning a `ChangePublisher` creates a new handle to the **same** subscriber
/// list.
pub struct ChangePublisher {
    inner: Rc<RefCell<PublisherInner>>,
}

impl Clone for ChangePublisher {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for ChangePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ChangePublisher")
            .field("subscriber_count", &inner.subscribers.len())
            .field("sends", &inner.sends)
            .finish()
    }
}

impl Default for ChangePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangePublisher {
    /// Create a publisher with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(PublisherInner {
                subscribers: Vec::new(),
                sends: 0,
            })),
        }
    }

    /// Notify every live subscriber once, in registration order.
    pub fn send(&self) {
        // Collect live slots first so no borrow is held during callbacks.
        let slots: Vec<Rc<Slot>> = {
            let mut inner = self.inner.borrow_mut();
            inner.sends += 1;
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for slot in &slots {
            if slot.active.get() {
                (slot.callback)();
            }
        }
    }

    /// Register `callback` to run on every subsequent [`send()`](Self::send).
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let slot = Rc::new(Slot {
            active: Cell::new(true),
            callback: Box::new(callback),
        });
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|w| w.strong_count() > 0);
        inner.subscribers.push(Rc::downgrade(&slot));
        Subscription { slot }
    }

    /// Number of registered subscribers, including cancelled ones that have
    /// not been pruned yet.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Number of subscribers whose guards are still alive.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Total number of `send()` calls on this publisher.
    #[must_use]
    pub fn send_count(&self) -> u64 {
        self.inner.borrow().sends
    }

    /// Non-owning handle to this publisher.
    #[must_use]
    pub fn downgrade(&self) -> WeakPublisher {
        WeakPublisher {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same publisher.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Non-owning handle to a [`ChangePublisher`].
///
/// Holding a `WeakPublisher` does not keep the publisher alive; once every
/// strong handle is gone, [`upgrade()`](Self::upgrade) returns `None`.
#[derive(Clone)]
pub struct WeakPublisher {
    inner: Weak<RefCell<PublisherInner>>,
}

impl WeakPublisher {
    /// Recover a strong handle if the publisher is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ChangePublisher> {
        self.inner.upgrade().map(|inner| ChangePublisher { inner })
    }

    /// Whether the publisher is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for WeakPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakPublisher")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// RAII guard for a registered callback.
///
/// Dropping the guard (or calling [`cancel()`](Self::cancel)) deactivates the
/// callback immediately and releases it; the publisher's weak handle then
/// fails to upgrade and is pruned on the next `send()` or `subscribe()`.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    slot: Rc<Slot>,
}

impl Subscription {
    /// Cancel the subscription. Equivalent to dropping it.
    pub fn cancel(self) {
        drop(self);
    }

    /// Whether the callback is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slot.active.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.slot.active.set(false);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
