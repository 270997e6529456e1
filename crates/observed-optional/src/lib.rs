#![forbid(unsafe_code)]

//! Observe an optional reference to a notifying object.
//!
//! A UI component often holds a model it may not have yet. This crate lets
//! it re-render whenever that model announces a change, follow the model when
//! the reference is replaced, and hand out two-way bindings into individual
//! fields, returning `None` while nothing is there.
//!
//! ```ignore
//! use observed_optional::{ObservationBridge, bind, field_path};
//!
//! let mut bridge = ObservationBridge::new();
//! let _redraw = bridge.notifications().subscribe(|| request_render());
//!
//! // Before every render pass:
//! bridge.recompute(model.as_ref());
//! let name = bind(model.as_ref(), &field_path!(Person, name));
//! ```
//!
//! Rendering, scheduling, and component lifecycle stay with the host. All
//! types are single-threaded.

pub mod config;
pub mod error;
pub mod logging;
pub mod reactive;

pub use config::{BridgeConfig, ResubscribePolicy};
pub use error::{Error, Result};
pub use reactive::{
    Accessor, BridgeStats, ChangePublisher, FieldBindingProjection, FieldPath, ObservableObject,
    ObservationBridge, ObservedOptional, Published, RelayChannel, Subscription, WeakPublisher,
    bind,
};
