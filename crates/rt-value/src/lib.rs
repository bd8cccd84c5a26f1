//! The tagged-value representation and attribute-chain trait dispatch
//! underlying every other runtime component.
//!
//! A [`Value`] is an attribute-chain pointer plus a small [`Payload`].
//! Polymorphism lives entirely on the chain — a linear walk for a
//! well-known tag (value, list, map, pointer, function) or, for
//! library-defined extensions, a dynamic dispatch through
//! [`Attribute`](traits::Attribute). New traits can be added without
//! touching the cell layout, at the cost of the dynamic dispatch.

pub mod attr;
pub mod convert;
pub mod cursor;
pub mod payload;
pub mod traits;
pub mod value;

pub use attr::{AttrKind, AttrNode};
pub use convert::{
    integer_attr, integer_mod, integer_of, parse_integer, parse_real, real_attr, real_of, value_of_integer,
    value_of_real,
};
pub use cursor::Cursor;
pub use payload::Payload;
pub use traits::{Attribute, FunctionTrait, ListTrait, MapTrait, PointerAttr, ValueTrait};
pub use value::Value;
