use std::sync::Arc;

use rt_util::symbol::Symbol;
use rt_value::attr::{AttrKind, AttrNode};
use rt_value::payload::Payload;
use rt_value::traits::FunctionTrait;
use rt_value::Value;

use crate::spec::FunctionSpec;
use crate::value_trait::FunctionAsValue;

/// The concrete [`FunctionTrait`] implementation: `rt-value` only needs
/// enough surface from a function value to report its arity, address, and
/// calling convention (the binding engine itself works directly against a
/// [`FunctionSpec`], not through this trait object).
#[derive(Debug)]
struct NativeFunction(Arc<FunctionSpec>);

impl FunctionTrait for NativeFunction {
    fn arity(&self) -> usize {
        self.0.arity()
    }

    fn address(&self) -> usize {
        self.0.address as usize
    }

    fn convention(&self) -> Symbol {
        self.0.convention
    }
}

/// Wraps a function specification into a full `Value`: a function-trait
/// node plus a value-trait node that renders the spec's string form.
pub(crate) fn function_value(spec: Arc<FunctionSpec>) -> Value {
    let value_node = AttrNode::new(AttrKind::Value(Arc::new(FunctionAsValue(spec.clone()))), None);
    let func_node = AttrNode::new(AttrKind::Function(Arc::new(NativeFunction(spec))), Some(value_node));
    Value::new(func_node, Payload::Unit)
}
