use std::sync::Arc;

use rt_value::Value;

use crate::array::{ArrayList, EmptyList};
use crate::consts::ARRAY_THRESHOLD;
use crate::node::list_value;
use crate::packed::PackedList;

/// Picks the smallest representation that holds `values`, per §4.4's
/// promotion rule: empty, then array-list up to the threshold, then
/// packed-list beyond it. Every list-producing operation in this crate
/// funnels its result through here so the promotion rule only needs
/// stating once.
pub(crate) fn from_values(values: Vec<Value>) -> Value {
    if values.is_empty() {
        list_value(Arc::new(EmptyList))
    } else if values.len() <= ARRAY_THRESHOLD {
        list_value(Arc::new(ArrayList::new(values)))
    } else {
        list_value(Arc::new(PackedList::new(values)))
    }
}
