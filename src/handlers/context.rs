//! # Opaque handler context.
//!
//! A [`Context`] is an optional, type-erased, shared value stored next to a callback
//! or a filter at registration time and handed back to it, untouched, on every
//! dispatch. It replaces the untyped user pointer of C-style callback APIs: the
//! callback recovers the concrete type with [`Context::downcast_ref`].
//!
//! ## Example
//! ```rust
//! use std::sync::Mutex;
//! use tagrouter::Context;
//!
//! let ctx = Context::new(Mutex::new(Vec::<String>::new()));
//!
//! if let Some(buf) = ctx.downcast_ref::<Mutex<Vec<String>>>() {
//!     buf.lock().unwrap().push("hello".into());
//! }
//! assert!(ctx.is::<Mutex<Vec<String>>>());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased value passed through to a handler or filter.
#[derive(Clone, Default)]
pub struct Context(Option<Arc<dyn Any + Send + Sync>>);

impl Context {
    /// Wraps `value` into a new context.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Wraps an already shared value without re-allocating.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(Some(value))
    }

    /// The empty context.
    pub fn none() -> Self {
        Self(None)
    }

    /// Returns `true` if no value is attached.
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Returns `true` if the attached value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Borrows the attached value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns `true` if both contexts share the same allocation (or are both empty).
    pub fn ptr_eq(&self, other: &Context) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Context(..)"),
            None => f.write_str("Context(None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_to_wrong_type_is_none() {
        let ctx = Context::new(5u32);
        assert_eq!(ctx.downcast_ref::<u32>(), Some(&5));
        assert!(ctx.downcast_ref::<u64>().is_none());
        assert!(!ctx.is_none());
    }

    #[test]
    fn test_clone_shares_value() {
        let ctx = Context::new(String::from("shared"));
        let copy = ctx.clone();
        assert!(ctx.ptr_eq(&copy));
        assert!(!ctx.ptr_eq(&Context::new(String::from("shared"))));
        assert!(Context::none().ptr_eq(&Context::default()));
    }
}
