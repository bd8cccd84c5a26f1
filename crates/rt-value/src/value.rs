use std::cmp::Ordering;
use std::sync::Arc;

use rt_util::error::{FormatError, UserError, UserErrorClass};
use rt_util::symbol::Symbol;

use crate::attr::{AttrKind, AttrNode};
use crate::cursor::Cursor;
use crate::payload::Payload;
use crate::traits::{Attribute, FunctionTrait, ListTrait, MapTrait, PointerAttr};

/// The universal tagged cell. Cheap to copy by reference: an `Arc` to the
/// attribute chain head plus a small payload.
#[derive(Debug, Clone)]
pub struct Value {
    attr: Arc<AttrNode>,
    payload: Payload,
}

impl Value {
    pub fn new(attr: Arc<AttrNode>, payload: Payload) -> Self {
        debug_assert!(
            attr.find_value().is_some(),
            "every value must have a value-trait node reachable from its attribute chain"
        );
        Self { attr, payload }
    }

    pub fn attr(&self) -> &Arc<AttrNode> {
        &self.attr
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Delegates through the value trait (§4.1 `to_string`).
    pub fn to_string(&self) -> String {
        self.attr
            .find_value()
            .expect("value-trait invariant")
            .to_string(&self.payload)
    }

    /// Uses the value trait's hash if it overrides the default; otherwise a
    /// hash derived from the string form. Since `ValueTrait::hash` already
    /// has that fallback built in, this is just the delegation.
    pub fn hash(&self) -> u64 {
        self.attr
            .find_value()
            .expect("value-trait invariant")
            .hash(&self.payload)
    }

    /// Byte-equal string forms, short-circuited by pointer and ASCII9
    /// identity (§4.1).
    pub fn equal(&self, other: &Value) -> bool {
        if Arc::ptr_eq(&self.attr, &other.attr) && self.payload.identical(&other.payload) {
            return true;
        }
        if let (Some(a), Some(b)) = (self.payload.as_ascii9(), other.payload.as_ascii9()) {
            return a == b;
        }
        self.to_string() == other.to_string()
    }

    /// Signed ordering of string forms.
    pub fn strcmp(&self, other: &Value) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }

    /// Linear walk of the attribute chain for the given tag.
    pub fn get_attribute(&self, tag: Symbol) -> Option<&AttrKind> {
        self.attr.find(tag)
    }

    pub fn weight(&self) -> usize {
        self.attr
            .find_value()
            .expect("value-trait invariant")
            .weight(&self.payload)
    }

    pub fn list_of(&self) -> Result<&Arc<dyn ListTrait>, FormatError> {
        self.attr
            .find_list()
            .ok_or_else(|| FormatError::InvalidList(self.to_string()))
    }

    pub fn map_of(&self) -> Result<&Arc<dyn MapTrait>, FormatError> {
        self.attr
            .find_map()
            .ok_or_else(|| FormatError::InvalidMap(self.to_string()))
    }

    pub fn function_of(&self) -> Result<&Arc<dyn FunctionTrait>, FormatError> {
        self.attr
            .find_function()
            .ok_or_else(|| FormatError::InvalidFunction(self.to_string()))
    }

    pub fn pointer_of(&self) -> Result<&Arc<PointerAttr>, FormatError> {
        self.attr
            .find_pointer()
            .ok_or_else(|| FormatError::InvalidPointer(self.to_string()))
    }

    /// Checks that a pointer value's mutability flag allows a mutable
    /// borrow, per §7's pointer-constness error class.
    pub fn require_mutable_pointer(&self) -> Result<(), UserError> {
        let ptr = self
            .pointer_of()
            .map_err(|e| UserError::new(UserErrorClass::PointerConstness, e.to_string()))?;
        if ptr.mutable {
            Ok(())
        } else {
            Err(UserError::pointer_constness(ptr.tag.as_str()))
        }
    }
}

/// Cursor-returning map operations raise a programmer error rather than
/// silently misbehaving when called against the `none` sentinel.
pub fn require_cursor(c: Cursor) -> Result<Cursor, UserError> {
    if c.is_none() {
        Err(UserError::key_not_found())
    } else {
        Ok(c)
    }
}
