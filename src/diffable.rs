//! Element capabilities required by the diff.
//!
//! An element exposes an identity (which logical item it is) and a content
//! equality (whether that item changed). Shared handles additionally expose a
//! stable address, which enables [`DiffMode::Identity`](crate::DiffMode).
//!
//! # Identity vs. Equality
//!
//! ```text
//! identity equal, content equal    -> kept (maybe moved)
//! identity equal, content differs  -> updated (maybe moved)
//! identity differs                 -> delete + insert
//! ```

use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

// =============================================================================
// Diffable
// =============================================================================

/// An element that can take part in a list diff.
///
/// The identifier must not change between the two snapshots being diffed.
///
/// # Example
///
/// ```
/// use tola_listdiff::Diffable;
///
/// struct Row {
///     id: u64,
///     title: String,
/// }
///
/// impl Diffable for Row {
///     type Id = u64;
///
///     fn diff_identifier(&self) -> u64 {
///         self.id
///     }
///
///     fn is_equal_to_diffable(&self, other: &Self) -> bool {
///         self.title == other.title
///     }
/// }
/// ```
pub trait Diffable {
    /// Identity type; duplicates across one sequence are allowed.
    type Id: Hash + Eq + Clone;

    /// Identity of this element.
    fn diff_identifier(&self) -> Self::Id;

    /// Content equality against an element with the same identity.
    fn is_equal_to_diffable(&self, other: &Self) -> bool;

    /// Address of the shared allocation behind this element.
    ///
    /// Value types return `None` and cannot be diffed in identity mode.
    #[inline]
    fn instance_addr(&self) -> Option<usize> {
        None
    }
}

// =============================================================================
// Value types
// =============================================================================

macro_rules! impl_diffable_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Diffable for $ty {
                type Id = $ty;

                #[inline]
                fn diff_identifier(&self) -> Self::Id {
                    *self
                }

                #[inline]
                fn is_equal_to_diffable(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_diffable_by_value!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char,
);

// Floats are keyed by bit pattern so NaN payloads and signed zeros stay distinct.
macro_rules! impl_diffable_float {
    ($($ty:ty => $bits:ty),* $(,)?) => {
        $(
            impl Diffable for $ty {
                type Id = $bits;

                #[inline]
                fn diff_identifier(&self) -> Self::Id {
                    self.to_bits()
                }

                #[inline]
                fn is_equal_to_diffable(&self, other: &Self) -> bool {
                    self.to_bits() == other.to_bits()
                }
            }
        )*
    };
}

impl_diffable_float!(f32 => u32, f64 => u64);

impl Diffable for str {
    type Id = String;

    fn diff_identifier(&self) -> String {
        self.to_owned()
    }

    fn is_equal_to_diffable(&self, other: &Self) -> bool {
        self == other
    }
}

impl Diffable for String {
    type Id = String;

    fn diff_identifier(&self) -> String {
        self.clone()
    }

    fn is_equal_to_diffable(&self, other: &Self) -> bool {
        self == other
    }
}

// =============================================================================
// Shared handles
// =============================================================================

/// Address of the value a pointer refers to, without metadata.
#[inline]
fn addr_of<T: ?Sized>(ptr: *const T) -> usize {
    ptr.cast::<()>() as usize
}

impl<T: Diffable + ?Sized> Diffable for &T {
    type Id = T::Id;

    #[inline]
    fn diff_identifier(&self) -> Self::Id {
        (**self).diff_identifier()
    }

    #[inline]
    fn is_equal_to_diffable(&self, other: &Self) -> bool {
        (**self).is_equal_to_diffable(*other)
    }

    #[inline]
    fn instance_addr(&self) -> Option<usize> {
        Some(addr_of(*self as *const T))
    }
}

impl<T: Diffable + ?Sized> Diffable for Rc<T> {
    type Id = T::Id;

    #[inline]
    fn diff_identifier(&self) -> Self::Id {
        (**self).diff_identifier()
    }

    #[inline]
    fn is_equal_to_diffable(&self, other: &Self) -> bool {
        (**self).is_equal_to_diffable(other)
    }

    #[inline]
    fn instance_addr(&self) -> Option<usize> {
        Some(addr_of(Rc::as_ptr(self)))
    }
}

impl<T: Diffable + ?Sized> Diffable for Arc<T> {
    type Id = T::Id;

    #[inline]
    fn diff_identifier(&self) -> Self::Id {
        (**self).diff_identifier()
    }

    #[inline]
    fn is_equal_to_diffable(&self, other: &Self) -> bool {
        (**self).is_equal_to_diffable(other)
    }

    #[inline]
    fn instance_addr(&self) -> Option<usize> {
        Some(addr_of(Arc::as_ptr(self)))
    }
}

// =============================================================================
// Tests
// =============================================================================
