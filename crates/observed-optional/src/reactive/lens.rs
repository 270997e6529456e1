#![forbid(unsafe_code)]

//! Typed lenses addressing one mutable field of an object.
//!
//! A [`FieldPath<T, V>`] is a named getter/setter pair over a shared `&T`.
//! Writes go through `&T`, so the field needs interior mutability; the
//! [`field_path!`](crate::field_path) macro builds a lens for any
//! [`Published`](super::Published) field.
//!
//! ```ignore
//! let name = field_path!(Person, name);
//! assert_eq!(name.name(), "name");
//! name.set(&person, "Zed".to_string());
//! assert_eq!(name.get(&person), "Zed");
//! ```

use std::rc::Rc;

/// A named (getter, setter) pair for a field of type `V` on `T`.
///
/// Cloning is cheap; both closures are shared.
pub struct FieldPath<T: ?Sized, V> {
    name: &'static str,
    get: Rc<dyn Fn(&T) -> V>,
    set: Rc<dyn Fn(&T, V)>,
}

impl<T: ?Sized, V> Clone for FieldPath<T, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            get: Rc::clone(&self.get),
            set: Rc::clone(&self.set),
        }
    }
}

impl<T: ?Sized, V> std::fmt::Debug for FieldPath<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldPath").field("name", &self.name).finish()
    }
}

impl<T: ?Sized + 'static, V: 'static> FieldPath<T, V> {
    /// Create a lens from a getter and a setter.
    pub fn new(
        name: &'static str,
        get: impl Fn(&T) -> V + 'static,
        set: impl Fn(&T, V) + 'static,
    ) -> Self {
        Self {
            name,
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    /// The symbolic field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Read the field from `object`.
    pub fn get(&self, object: &T) -> V {
        (self.get)(object)
    }

    /// Write the field on `object`.
    pub fn set(&self, object: &T, value: V) {
        (self.set)(object, value);
    }
}

/// Build a [`FieldPath`](crate::reactive::FieldPath) for a
/// [`Published`](crate::reactive::Published) field.
///
/// # Examples
///
/// ```ignore
/// let path = field_path!(Person, name);
/// let accessor = bind(Some(&person), &path);
/// ```
#[macro_export]
macro_rules! field_path {
    ($ty:ty, $field:ident) => {
        $crate::reactive::FieldPath::new(
            ::core::stringify!($field),
            |object: &$ty| object.$field.get(),
            |object: &$ty, value| object.$field.set(value),
        )
    };
}
