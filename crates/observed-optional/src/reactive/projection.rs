#![forbid(unsafe_code)]

//! On-demand two-way field bindings over an optional observed reference.
//!
//! [`bind()`] turns an optional reference and a [`FieldPath`] into an
//! [`Accessor`], or `None` when there is no object. The accessor captures
//! the object it was created for and keeps acting on it even if the host later
//! swaps its reference; hosts rebuild bindings on every render pass.
//!
//! Accessors never subscribe to anything. Re-rendering after a write comes from
//! the [`ObservationBridge`](super::ObservationBridge) forwarding the object's
//! will-change notification.
//!
//! # Invariants
//!
//! 1. `bind(None, _)` is always `None`.
//! 2. `Accessor::get()` reads the field at call time (no caching).
//! 3. `Accessor::set(v)` followed by `Accessor::get()` returns `v` for lenses
//!    whose setter stores what it is given.

use std::rc::Rc;

use super::lens::FieldPath;

/// A read/write surface for one field of one captured object.
pub struct Accessor<V> {
    field: &'static str,
    get: Rc<dyn Fn() -> V>,
    set: Rc<dyn Fn(V)>,
}

impl<V> Clone for Accessor<V> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            get: Rc::clone(&self.get),
            set: Rc::clone(&self.set),
        }
    }
}

impl<V> std::fmt::Debug for Accessor<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Reading the field here would re-borrow it, which panics inside
        // `Published::with`/`update` on the same field.
        f.debug_struct("Accessor")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

impl<V> Accessor<V> {
    /// Read the current field value.
    #[must_use]
    pub fn get(&self) -> V {
        (self.get)()
    }

    /// Write the field on the captured object.
    pub fn set(&self, value: V) {
        (self.set)(value);
    }

    /// Read, modify, and write back the field.
    pub fn update(&self, f: impl FnOnce(&mut V)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// Name of the bound field.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        self.field
    }
}

/// Bind `path` on `reference`, or return `None` when there is no object.
#[must_use]
pub fn bind<T, V>(reference: Option<&Rc<T>>, path: &FieldPath<T, V>) -> Option<Accessor<V>>
where
    T: ?Sized + 'static,
    V: 'static,
{
    let object = Rc::clone(reference?);
    let reader = Rc::clone(&object);
    let get_path = path.clone();
    let set_path = path.clone();
    Some(Accessor {
        field: path.name(),
        get: Rc::new(move || get_path.get(&reader)),
        set: Rc::new(move |value| set_path.set(&object, value)),
    })
}

/// Snapshot of the observed reference taken for one render pass.
///
/// Stateless apart from the captured reference; cheap to create per pass.
pub struct FieldBindingProjection<T: ?Sized> {
    object: Option<Rc<T>>,
}

impl<T: ?Sized> Clone for FieldBindingProjection<T> {
    fn clone(&self) -> Self {
        Self {
            object: self.object.clone(),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for FieldBindingProjection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBindingProjection")
            .field("available", &self.object.is_some())
            .finish()
    }
}

impl<T: ?Sized + 'static> FieldBindingProjection<T> {
    #[must_use]
    pub fn new(reference: Option<&Rc<T>>) -> Self {
        Self {
            object: reference.cloned(),
        }
    }

    /// Two-way accessor for `path`, or `None` when nothing is observed.
    #[must_use]
    pub fn bind<V: 'static>(&self, path: &FieldPath<T, V>) -> Option<Accessor<V>> {
        bind(self.object.as_ref(), path)
    }

    /// The captured reference.
    #[must_use]
    pub fn object(&self) -> Option<&Rc<T>> {
        self.object.as_ref()
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.object.is_some()
    }
}
