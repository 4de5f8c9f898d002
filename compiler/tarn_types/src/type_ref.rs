//! Type references.

use crate::ClassId;

/// A reference to a class type, possibly as an array.
///
/// The `raw` bit marks a deliberately non-parameterized reference to a
/// generic class. Synthesized members that mention the enclosing class (the
/// lambda body method's receiver parameter) must use a raw reference so the
/// written descriptor never carries type-argument information; building a
/// distinct reference value keeps the shared [`ClassInfo`] untouched.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeRef {
    class: ClassId,
    dims: u8,
    raw: bool,
}

impl TypeRef {
    /// A plain (possibly parameterized) reference to a class.
    #[inline]
    pub const fn of(class: ClassId) -> Self {
        TypeRef {
            class,
            dims: 0,
            raw: false,
        }
    }

    /// An array type with the given number of dimensions.
    #[inline]
    pub const fn array(class: ClassId, dims: u8) -> Self {
        TypeRef {
            class,
            dims,
            raw: false,
        }
    }

    /// A raw, non-parameterized reference to a class.
    #[inline]
    pub const fn raw(class: ClassId) -> Self {
        TypeRef {
            class,
            dims: 0,
            raw: true,
        }
    }

    /// The referenced class.
    #[inline]
    pub const fn class(self) -> ClassId {
        self.class
    }

    /// Array dimensions, 0 for a scalar reference.
    #[inline]
    pub const fn dims(self) -> u8 {
        self.dims
    }

    /// Whether this is a raw (non-parameterized) reference.
    #[inline]
    pub const fn is_raw(self) -> bool {
        self.raw
    }
}
