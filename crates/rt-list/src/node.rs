use std::sync::Arc;

use rt_value::attr::{AttrKind, AttrNode};
use rt_value::payload::Payload;
use rt_value::{ListTrait, Value};

use crate::value_trait::ListAsValue;

/// Wraps a concrete list representation into a full `Value`: a list-trait
/// node followed by a value-trait node that delegates back to the same
/// representation for `to_string`/`weight`.
pub(crate) fn list_value(list: Arc<dyn ListTrait>) -> Value {
    let value_node = AttrNode::new(AttrKind::Value(Arc::new(ListAsValue(list.clone()))), None);
    let list_node = AttrNode::new(AttrKind::List(list), Some(value_node));
    Value::new(list_node, Payload::Unit)
}
