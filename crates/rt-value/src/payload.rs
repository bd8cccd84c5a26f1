use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The non-attribute half of a value cell.
///
/// The original representation aliases a 64-bit unsigned integer, a machine
/// word pointer, a packed 9-character string, and raw bytes over the same
/// storage. A safe Rust cell can't alias like that, so `Heap` stands in for
/// "pointer to something the owning trait knows how to interpret" — ropes,
/// list backing stores, map backing stores, and pointer targets all live
/// behind it, downcast by whichever trait attached them.
#[derive(Clone)]
pub enum Payload {
    /// No payload beyond the attribute chain (empty-list, empty-map, and
    /// other values whose entire state lives in the attribute itself).
    Unit,
    /// A 64-bit unsigned integer, used directly by integers and as the raw
    /// bit pattern for anything else that fits in one machine word.
    Uint(u64),
    /// A packed 9-character ASCII string, stored as its 63-bit encoding.
    Ascii9(u64),
    /// A type-erased heap reference: ropes, persistent-vector-backed list
    /// and map storage, function representations, pointer targets.
    Heap(Arc<dyn Any + Send + Sync>),
}

impl Payload {
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Payload::Uint(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_ascii9(&self) -> Option<u64> {
        match self {
            Payload::Ascii9(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_heap<T: Any>(&self) -> Option<&T> {
        match self {
            Payload::Heap(a) => a.downcast_ref(),
            _ => None,
        }
    }

    pub fn heap(value: impl Any + Send + Sync) -> Self {
        Payload::Heap(Arc::new(value))
    }

    /// Byte-level identity used by `Value::equal`'s fast path. Two `Unit`
    /// payloads are always identical; heap payloads compare by pointer.
    pub fn identical(&self, other: &Payload) -> bool {
        match (self, other) {
            (Payload::Unit, Payload::Unit) => true,
            (Payload::Uint(a), Payload::Uint(b)) => a == b,
            (Payload::Ascii9(a), Payload::Ascii9(b)) => a == b,
            (Payload::Heap(a), Payload::Heap(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Unit => write!(f, "Unit"),
            Payload::Uint(n) => write!(f, "Uint({n})"),
            Payload::Ascii9(n) => write!(f, "Ascii9({n:#x})"),
            Payload::Heap(_) => write!(f, "Heap(..)"),
        }
    }
}
