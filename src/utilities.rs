//! Odds and ends.

use std::fmt::Debug;
use std::hash::Hash;

/// A trait for anything we use as a key in a HashMap.
pub trait KeyLike: Eq + Hash + Copy + Debug + Sized {}

/// A trait for anything we use as a zero-based index.
///
/// The model uses a global numbering of cells and edges while the trace uses per-process local
/// numbering; giving each numbering its own index type keeps the two from being confused.
pub trait IndexLike: KeyLike + PartialOrd + Ord {
    /// Convert a `usize` to the index.
    fn from_usize(value: usize) -> Self;

    /// Convert the index to a `usize`.
    fn to_usize(&self) -> usize;

    /// The invalid (maximal) value.
    fn invalid() -> Self;

    /// Is a valid value (not the maximal value).
    fn is_valid(&self) -> bool {
        *self != Self::invalid()
    }
}

/// A macro for implementing some `IndexLike` type.
///
/// This should be converted to a derive macro.
#[macro_export]
macro_rules! index_type {
    ($name:ident, $type:ident) => {
        #[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Debug)]
        pub struct $name($type);

        impl $crate::KeyLike for $name {}

        impl $crate::IndexLike for $name {
            fn from_usize(value: usize) -> Self {
                $name(<$type as num_traits::FromPrimitive>::from_usize(value).unwrap())
            }

            fn to_usize(&self) -> usize {
                let $name(value) = self;
                <$type as num_traits::ToPrimitive>::to_usize(value).unwrap()
            }

            fn invalid() -> Self {
                $name(<$type as num_traits::Bounded>::max_value())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", $crate::IndexLike::to_usize(self))
            }
        }
    };
}

// BEGIN MAYBE TESTED

index_type! { CellId, u32 }
index_type! { ProcessId, u32 }
index_type! { EdgeId, u32 }
index_type! { LocalEdgeIndex, u32 }
index_type! { ExpressionId, u32 }

// END MAYBE TESTED

/// Split a `<prefix><separator><suffix>` name at the last separator.
///
/// A name without the separator is all suffix.
pub(crate) fn split_last<'a>(name: &'a str, separator: &str) -> (&'a str, &'a str) {
    match name.rfind(separator) {
        Some(position) => (&name[..position], &name[position + separator.len()..]),
        None => ("", name),
    }
}
