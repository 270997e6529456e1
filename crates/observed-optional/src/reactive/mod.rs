#![forbid(unsafe_code)]

//! Observation forwarding and field bindings for optional references.
//!
//! This module provides the pieces a component needs to watch an object it
//! may or may not have:
//!
//! - [`ChangePublisher`]: A shared, valueless will-change notifier with
//!   [`Subscription`] RAII guards. Domain types embed one and implement
//!   [`ObservableObject`].
//! - [`Published`]: A field cell that sends on its owner's publisher before
//!   every write.
//! - [`ObservationBridge`]: Keeps one forwarding subscription aligned with the
//!   current optional reference and relays changes to a stable
//!   [`RelayChannel`] the host watches.
//! - [`FieldPath`], [`Accessor`], [`FieldBindingProjection`], [`bind`]:
//!   Typed two-way bindings into one field of the observed object, or `None`
//!   when there is no object.
//! - [`ObservedOptional`]: The reference and its bridge in one value.
//!
//! # Architecture
//!
//! Everything is single-threaded (`Rc<RefCell<..>>`). Publishers hold `Weak`
//! handles to subscriber slots; the bridge's forwarding callback holds a
//! `Weak` handle to the relay. Dropping a guard or the bridge therefore never
//! leaves a callback that can reach freed state.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. A cancelled [`Subscription`] never runs again.
//! 3. After `recompute(r)`, the bridge forwards from `r` only.
//! 4. One observed send produces exactly one relay send.
//! 5. `bind(None, _)` is `None`.

pub mod bridge;
pub mod lens;
pub mod observed;
pub mod projection;
pub mod published;
pub mod publisher;
pub mod relay;

pub use bridge::{BridgeStats, ObservationBridge};
pub use lens::FieldPath;
pub use observed::ObservedOptional;
pub use projection::{Accessor, FieldBindingProjection, bind};
pub use published::Published;
pub use publisher::{ChangePublisher, ObservableObject, Subscription, WeakPublisher};
pub use relay::RelayChannel;
