use std::sync::Arc;

use rt_value::Value;

use crate::consts::LIST_MAP_THRESHOLD;
use crate::empty::EmptyMap;
use crate::hash_map::HashMap;
use crate::list_map::ListMap;
use crate::node::map_value;

/// Chooses the smallest representation holding `pairs`, in insertion order.
/// Every map-producing operation funnels through here so the
/// empty/list-map/hash-map promotion rule only needs stating once.
pub(crate) fn from_pairs(pairs: Vec<(Value, Value)>) -> Value {
    if pairs.is_empty() {
        map_value(Arc::new(EmptyMap))
    } else if pairs.len() <= LIST_MAP_THRESHOLD {
        map_value(Arc::new(ListMap::new(pairs)))
    } else {
        map_value(Arc::new(HashMap::build(pairs)))
    }
}
