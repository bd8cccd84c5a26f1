use std::sync::Arc;

use rt_value::attr::{AttrKind, AttrNode};
use rt_value::payload::Payload;
use rt_value::{ListTrait, MapTrait, Value};

use crate::value_trait::MapAsValue;

/// Wraps a concrete map representation into a full `Value`: a map-trait
/// node, a list-trait node exposing the same representation's alternating
/// key/value list view (§4.5 — "the list view of a hash-map reports
/// `2*npairs` elements"), and a value-trait node delegating `to_string` to
/// that list view. Every concrete representation (`EmptyMap`, `ListMap`,
/// `HashMap`) implements both `ListTrait` and `MapTrait` directly, so the
/// two attribute-chain entries are two trait-object views of one
/// allocation rather than a generic adapter walking an abstract interface.
pub(crate) fn map_value<R>(repr: Arc<R>) -> Value
where
    R: ListTrait + MapTrait + 'static,
{
    let list_arc: Arc<dyn ListTrait> = repr.clone();
    let map_arc: Arc<dyn MapTrait> = repr;
    let value_node = AttrNode::new(AttrKind::Value(Arc::new(MapAsValue(list_arc.clone()))), None);
    let list_node = AttrNode::new(AttrKind::List(list_arc), Some(value_node));
    let map_node = AttrNode::new(AttrKind::Map(map_arc), Some(list_node));
    Value::new(map_node, Payload::Unit)
}
