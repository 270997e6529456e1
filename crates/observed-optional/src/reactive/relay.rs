#![forbid(unsafe_code)]

//! The bridge-owned notification source the host watches for redraws.

use super::publisher::{ChangePublisher, Subscription, WeakPublisher};

/// Stable render-trigger signal owned by an
/// [`ObservationBridge`](super::ObservationBridge).
///
/// Unlike [`ChangePublisher`], a `RelayChannel` is not `Clone`: the only
/// strong handle lives inside the bridge, so dropping the bridge ends the
/// channel and turns every forwarding callback into a no-op.
pub struct RelayChannel {
    publisher: ChangePublisher,
}

impl RelayChannel {
    pub(crate) fn new() -> Self {
        Self {
            publisher: ChangePublisher::new(),
        }
    }

    /// Watch for render triggers. A new subscriber only receives events sent
    /// after this call.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.publisher.subscribe(callback)
    }

    /// Total number of render triggers emitted so far.
    #[must_use]
    pub fn send_count(&self) -> u64 {
        self.publisher.send_count()
    }

    /// Number of host subscribers whose guards are still alive.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        self.publisher.live_subscriber_count()
    }

    /// Whether `self` and `other` are the same channel.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.publisher.ptr_eq(&other.publisher)
    }

    pub(crate) fn send(&self) {
        self.publisher.send();
    }

    pub(crate) fn downgrade(&self) -> WeakPublisher {
        self.publisher.downgrade()
    }
}

impl std::fmt::Debug for RelayChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayChannel")
            .field("sends", &self.send_count())
            .field("live_subscribers", &self.live_subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn late_subscriber_starts_from_now() {
        let relay = RelayChannel::new();
        relay.send();

        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = relay.subscribe(move || count_clone.set(count_clone.get() + 1));
        assert_eq!(count.get(), 0);

        relay.send();
        assert_eq!(count.get(), 1);
        assert_eq!(relay.send_count(), 2);
    }

    #[test]
    fn weak_handle_dies_with_channel() {
        let relay = RelayChannel::new();
        let weak = relay.downgrade();
        assert!(weak.is_alive());

        drop(relay);
        assert!(weak.upgrade().is_none());
    }
}
