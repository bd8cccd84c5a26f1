//! The two error surfaces shared by every runtime crate.
//!
//! The runtime recognizes exactly two kinds of recoverable failure:
//!
//! - [`FormatError`] — a parse or conversion failed because a string did not
//!   conform to the grammar an operation expected (`integer_of`, a list
//!   parse, a function-spec parse, ...).
//! - [`UserError`] — a runtime check failed: an index out of bounds,
//!   division by zero, a missing map key, a pointer constness mismatch, an
//!   argument-binding failure. Carries a class symbol and a message, mirroring
//!   the error-class-symbol-plus-message-map value the original runtime
//!   throws up the stack.
//!
//! Internal invariant violations (a malformed persistent-vector frontier, a
//! corrupt hash-map index array) are not represented here — those abort the
//! process via `panic!`/`debug_assert!`, matching the stance already taken
//! by this workspace's allocator crate that heap corruption is not a
//! recoverable condition.

use thiserror::Error;

/// A parse or conversion failure: the input string did not conform to the
/// grammar the target type expects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("not a valid integer: {0:?}")]
    InvalidInteger(String),

    #[error("not a valid real number: {0:?}")]
    InvalidReal(String),

    #[error("not a valid list: {0}")]
    InvalidList(String),

    #[error("not a valid map: {0}")]
    InvalidMap(String),

    #[error("not a valid function specification: {0}")]
    InvalidFunction(String),

    #[error("not a valid pointer: {0}")]
    InvalidPointer(String),

    #[error("unbalanced braces in verbatim string literal")]
    UnbalancedBraces,

    #[error("invalid escape sequence: {0}")]
    InvalidEscape(String),
}

/// The class symbol carried by a [`UserError`].
///
/// These correspond to the runtime check families named in spec §7: bounds,
/// arithmetic, map-key lookup, pointer constness, and argument binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserErrorClass {
    IndexOutOfBounds,
    DivisionByZero,
    KeyNotFound,
    PointerConstness,
    ArgumentBinding,
}

impl UserErrorClass {
    /// The conventional symbolic name of this class, as it would appear as
    /// the first element of the two-element error value (error-class symbol,
    /// message map) described in spec §7.
    pub fn symbol(self) -> &'static str {
        match self {
            UserErrorClass::IndexOutOfBounds => "index-out-of-bounds",
            UserErrorClass::DivisionByZero => "division-by-zero",
            UserErrorClass::KeyNotFound => "key-not-found",
            UserErrorClass::PointerConstness => "pointer-constness",
            UserErrorClass::ArgumentBinding => "argument-binding",
        }
    }
}

/// A runtime check failure: carries an error-class symbol and a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}: {message}", class.symbol())]
pub struct UserError {
    pub class: UserErrorClass,
    pub message: String,
}

impl UserError {
    pub fn new(class: UserErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }

    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::new(
            UserErrorClass::IndexOutOfBounds,
            format!("index {index} out of bounds for length {length}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(UserErrorClass::DivisionByZero, "division by zero")
    }

    pub fn key_not_found() -> Self {
        Self::new(
            UserErrorClass::KeyNotFound,
            "get/set/delete on a `none` cursor",
        )
    }

    pub fn pointer_constness(tag: &str) -> Self {
        Self::new(
            UserErrorClass::PointerConstness,
            format!("mutable access requested on immutable pointer of tag {tag:?}"),
        )
    }

    pub fn argument_binding(message: impl Into<String>) -> Self {
        Self::new(UserErrorClass::ArgumentBinding, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_carries_class_symbol() {
        let e = UserError::index_out_of_bounds(5, 3);
        assert_eq!(e.class.symbol(), "index-out-of-bounds");
        assert!(e.message.contains('5'));
    }

    #[test]
    fn format_error_display_is_stable() {
        let e = FormatError::InvalidInteger("abc".to_string());
        assert_eq!(e.to_string(), "not a valid integer: \"abc\"");
    }
}
