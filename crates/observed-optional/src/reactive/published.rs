#![forbid(unsafe_code)]

//! Field cells that announce changes through their owner's publisher.
//!
//! A [`Published<V>`] holds one field of an [`ObservableObject`] and a handle
//! to the object's [`ChangePublisher`]. Every mutation sends on the publisher
//! first and stores the new value second, so subscribers observe the change
//! *before* it becomes visible (will-change semantics).
//!
//! ```ignore
//! struct Person {
//!     will_change: ChangePublisher,
//!     name: Published<String>,
//! }
//!
//! impl Person {
//!     fn new(name: &str) -> Self {
//!         let will_change = ChangePublisher::new();
//!         let name = Published::new(&will_change, name.to_string());
//!         Self { will_change, name }
//!     }
//! }
//! ```
//!
//! [`ObservableObject`]: super::ObservableObject

use std::cell::RefCell;

use super::publisher::ChangePublisher;

/// A mutable field that sends a will-change notification on every write.
///
/// Writes always notify, even when the new value equals the old one; there is
/// no `PartialEq` requirement on `V`.
pub struct Published<V> {
    value: RefCell<V>,
    will_change: ChangePublisher,
}

impl<V: std::fmt::Debug> std::fmt::Debug for Published<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Published")
            .field("value", &self.value.borrow())
            .finish()
    }
}

impl<V> Published<V> {
    /// Create a field that announces through `publisher`.
    #[must_use]
    pub fn new(publisher: &ChangePublisher, value: V) -> Self {
        Self {
            value: RefCell::new(value),
            will_change: publisher.clone(),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> V
    where
        V: Clone,
    {
        self.value.borrow().clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Announce the change, then store `value`.
    ///
    /// # Panics
    ///
    /// Panics if called while the value is borrowed through [`with()`](Self::with).
    pub fn set(&self, value: V) {
        self.will_change.send();
        *self.value.borrow_mut() = value;
    }

    /// Announce the change, then store `value` and return the previous one.
    pub fn replace(&self, value: V) -> V {
        self.will_change.send();
        self.value.replace(value)
    }

    /// Announce the change, then modify the value in place.
    pub fn update(&self, f: impl FnOnce(&mut V)) {
        self.will_change.send();
        f(&mut self.value.borrow_mut());
    }
}
