//! rt-util - Shared Foundation Types
//!
//! Utilities used across every crate in the runtime: string interning
//! ([`symbol`]), typed-index vectors ([`index_vec`]), and the two-surface
//! error model ([`error`]) that every fallible, spec-defined operation in
//! the runtime returns.
//!
//! These are zero-cost, domain-agnostic building blocks; none of them know
//! about values, lists, maps, or bindings — those live in `rt-value`,
//! `rt-list`, `rt-map`, and `rt-bind` respectively.

pub mod def_id;
pub mod error;
pub mod index_vec;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use error::{FormatError, UserError, UserErrorClass};
pub use index_vec::{Idx, IndexVec};
pub use symbol::Symbol;

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;

/// Defines a newtype index type and its [`Idx`] impl in one shot, so callers
/// never hand-write the boilerplate for a fresh typed-index space (an
/// attribute tag registry key, a cursor generation counter, and so on).
#[macro_export]
macro_rules! define_idx {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $crate::Idx for $name {
            fn from_usize(idx: usize) -> Self {
                assert!(idx <= u32::MAX as usize);
                $name(idx as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}
