use std::sync::Arc;

use rt_value::payload::Payload;
use rt_value::traits::ValueTrait;

use crate::spec::FunctionSpec;
use crate::string_form::format;

/// The value-trait companion of a function value: its string form is the
/// function string form (§6), produced from the same [`FunctionSpec`] the
/// function-trait node carries.
#[derive(Debug)]
pub(crate) struct FunctionAsValue(pub(crate) Arc<FunctionSpec>);

impl ValueTrait for FunctionAsValue {
    fn to_string(&self, _payload: &Payload) -> String {
        format(&self.0)
    }
}
