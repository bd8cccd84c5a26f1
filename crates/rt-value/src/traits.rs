use std::fmt;

use rt_util::error::UserError;
use rt_util::symbol::Symbol;

use crate::cursor::Cursor;
use crate::payload::Payload;
use crate::value::Value;

/// The trait every value's attribute chain must carry. Supplies string
/// conversion and, optionally, a faster hash or a custom equality rule.
///
/// `to_string` is the one operation every value needs; the chain walk to
/// find this trait is the reason the value trait is required to be first
/// (or at least present) on every chain.
pub trait ValueTrait: fmt::Debug + Send + Sync {
    fn to_string(&self, payload: &Payload) -> String;

    /// Default hash derives from the string form. Override when a faster
    /// scramble of the payload bits is available (e.g. ASCII9 strings,
    /// small integers).
    fn hash(&self, payload: &Payload) -> u64 {
        let s = self.to_string(payload);
        fxhash_bytes(s.as_bytes())
    }

    /// A size hint used to bias representation choices (e.g. packed-list
    /// element layout). Defaults to the string form's byte length.
    fn weight(&self, payload: &Payload) -> usize {
        self.to_string(payload).len()
    }
}

pub(crate) fn fxhash_bytes(bytes: &[u8]) -> u64 {
    // Same mixing constant rustc-hash's FxHasher uses; kept local so this
    // crate doesn't need to construct a Hasher just to hash a byte slice.
    const SEED: u64 = 0x51_7c_c1_b7_27_22_0a_95;
    let mut hash: u64 = 0;
    for chunk in bytes.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        let w = u64::from_le_bytes(word);
        hash = (hash.rotate_left(5) ^ w).wrapping_mul(SEED);
    }
    hash ^ (bytes.len() as u64)
}

/// The list trait: every operation spec.md §4.4 names, expressed over the
/// public `Value` type so callers never see a representation-specific type.
pub trait ListTrait: fmt::Debug + Send + Sync + 'static {
    fn len(&self) -> usize;
    fn index(&self, i: usize) -> Result<Value, UserError>;
    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError>;
    fn append(&self, v: Value) -> Value;
    fn concat(&self, other: &Value) -> Result<Value, UserError>;
    fn remove(&self, lo: usize, hi: usize) -> Result<Value, UserError>;
    fn set(&self, i: usize, v: Value) -> Result<Value, UserError>;

    /// Escape hatch for representation-specific fast paths (e.g. `flatten`
    /// recognizing it is exactly inverting a `group` without re-deriving
    /// that from general structure). Every concrete list implements this as
    /// `self`; callers downcast with `Any::downcast_ref`.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// The map trait: every operation spec.md §4.5 names.
pub trait MapTrait: fmt::Debug + Send + Sync + 'static {
    fn npairs(&self) -> usize;
    fn find(&self, key: &Value) -> Cursor;
    fn next(&self, cursor: Cursor) -> Cursor;
    fn get_key(&self, cursor: Cursor) -> Value;
    fn get_value(&self, cursor: Cursor) -> Value;
    fn set(&self, cursor: Cursor, value: Value) -> Value;
    fn add(&self, key: Value, value: Value) -> Value;
    fn delete(&self, cursor: Cursor) -> Value;

    /// Escape hatch mirroring `ListTrait::as_any`: lets a map's value-trait
    /// companion downcast to the concrete representation to walk every pair
    /// in insertion order for `to_string`, without widening this trait's
    /// public surface with an iteration method no other caller needs.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// The function trait. The binding algorithm itself (argument matching,
/// materialization, partial application) lives in `rt-bind`, which attaches
/// the concrete implementation of this trait to a function value; `rt-value`
/// only needs enough surface to format a function's string form (§6) and to
/// let `function_of` recognize a function value.
pub trait FunctionTrait: fmt::Debug + Send + Sync {
    fn arity(&self) -> usize;
    fn address(&self) -> usize;
    /// One of the well-known calling-convention tags (`CC_AVA`, `CC_C`,
    /// `CC_MSSTD`, `CC_THIS`).
    fn convention(&self) -> Symbol;
}

/// The pointer prototype: a named native type tag plus a mutability flag.
/// Unlike list/map/function, this trait carries no behavior of its own —
/// the pointed-to object lives in the value's `Payload::Heap` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerAttr {
    pub tag: Symbol,
    pub mutable: bool,
}

impl PointerAttr {
    pub fn new(tag: Symbol, mutable: bool) -> Self {
        Self { tag, mutable }
    }

    /// Pointer marshal descriptor spelling from §6: `tag*` (mutable) or
    /// `tag&` (const); an empty tag means void.
    pub fn descriptor(&self) -> String {
        let suffix = if self.mutable { '*' } else { '&' };
        format!("{}{}", self.tag.as_str(), suffix)
    }
}

/// An attribute outside the four well-known kinds (value, list, map,
/// pointer/function). Library code can extend the chain with its own traits
/// without touching this crate, at the cost of a dynamic dispatch instead
/// of a tag match.
pub trait Attribute: fmt::Debug + Send + Sync {
    fn tag(&self) -> Symbol;
}
