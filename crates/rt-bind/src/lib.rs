//! Function specifications and the parameter-binding algorithm (§4.6):
//! argument specifications, the left-greedy/right-greedy/named-scan
//! binding procedure, unpack recovery, materialization, and partial
//! application.
//!
//! Every function-producing operation funnels through [`of_spec`], which
//! attaches the concrete [`rt_value::traits::FunctionTrait`] implementation
//! and a value-trait companion rendering the function string form (§6) to
//! a [`Value`]. The binding algorithm itself (`bind`, `materialize`,
//! `explode`, `partial_apply`) works directly against a [`FunctionSpec`]
//! rather than through that trait, since arity/address/convention is all
//! `rt-value` needs to expose.

mod bind;
mod explode;
mod materialize;
mod node;
mod param;
mod partial;
mod spec;
mod string_form;
mod value_trait;

use std::sync::Arc;

use rt_util::error::FormatError;
use rt_value::Value;

pub use bind::{bind, BindStatus, Binding, BoundArg};
pub use explode::explode;
pub use materialize::materialize;
pub use param::Param;
pub use partial::partial_apply;
pub use spec::{ArgSpec, BindingKind, FunctionSpec, MarshalType};

use node::function_value;

/// Wraps a function specification into a callable `Value`.
pub fn of_spec(spec: FunctionSpec) -> Value {
    function_value(Arc::new(spec))
}

/// Parses a function's string form (§6) into a [`FunctionSpec`].
pub fn parse(input: &str) -> Result<FunctionSpec, FormatError> {
    string_form::parse(input)
}

/// Parses a function's string form directly into a callable `Value`.
pub fn value_of(input: &str) -> Result<Value, FormatError> {
    Ok(of_spec(parse(input)?))
}
