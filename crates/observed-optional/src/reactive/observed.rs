#![forbid(unsafe_code)]

//! Property-wrapper style facade pairing an optional reference with its bridge.
//!
//! [`ObservedOptional<T>`] is what a component stores: the wrapped reference,
//! plus the [`ObservationBridge`] that watches it. The component calls
//! [`update()`](ObservedOptional::update) before rendering and asks
//! [`projected_value()`](ObservedOptional::projected_value) for field
//! bindings.
//!
//! ```ignore
//! let mut person = ObservedOptional::new(Some(Rc::clone(&ann)));
//! let _redraw = person.notifications().subscribe(|| schedule_render());
//!
//! // Each render pass:
//! person.update();
//! if let Some(name) = person.projected_value().bind(&field_path!(Person, name)) {
//!     text_field(name);
//! }
//! ```

use std::rc::Rc;

use super::bridge::ObservationBridge;
use super::projection::FieldBindingProjection;
use super::publisher::ObservableObject;
use super::relay::RelayChannel;
use crate::config::BridgeConfig;

/// An optional observed reference with change forwarding.
pub struct ObservedOptional<T: ObservableObject + ?Sized> {
    wrapped: Option<Rc<T>>,
    bridge: ObservationBridge<T>,
}

impl<T: ObservableObject + ?Sized> std::fmt::Debug for ObservedOptional<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservedOptional")
            .field("present", &self.wrapped.is_some())
            .field("bridge", &self.bridge)
            .finish()
    }
}

impl<T: ObservableObject + ?Sized + 'static> ObservedOptional<T> {
    /// Wrap `wrapped_value`. Nothing is observed until the first
    /// [`update()`](Self::update).
    #[must_use]
    pub fn new(wrapped_value: Option<Rc<T>>) -> Self {
        Self::with_config(wrapped_value, BridgeConfig::default())
    }

    #[must_use]
    pub fn with_config(wrapped_value: Option<Rc<T>>, config: BridgeConfig) -> Self {
        Self {
            wrapped: wrapped_value,
            bridge: ObservationBridge::with_config(config),
        }
    }

    /// The wrapped reference.
    #[must_use]
    pub fn wrapped_value(&self) -> Option<&Rc<T>> {
        self.wrapped.as_ref()
    }

    /// Replace the wrapped reference. Takes effect at the next `update()`.
    pub fn set_wrapped_value(&mut self, wrapped_value: Option<Rc<T>>) {
        self.wrapped = wrapped_value;
    }

    /// Realign change forwarding with the wrapped reference.
    pub fn update(&mut self) {
        self.bridge.recompute(self.wrapped.as_ref());
    }

    /// Field bindings over the wrapped reference as it is right now.
    #[must_use]
    pub fn projected_value(&self) -> FieldBindingProjection<T> {
        FieldBindingProjection::new(self.wrapped.as_ref())
    }

    /// The render-trigger signal.
    #[must_use]
    pub fn notifications(&self) -> &RelayChannel {
        self.bridge.notifications()
    }

    #[must_use]
    pub fn bridge(&self) -> &ObservationBridge<T> {
        &self.bridge
    }
}
