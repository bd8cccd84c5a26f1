use std::sync::Arc;

use rt_value::payload::Payload;
use rt_value::traits::ValueTrait;
use rt_value::ListTrait;

/// The value-trait side of every map value: its canonical string form is
/// exactly its list view's (§6's "escape_for_list of each element, joined
/// by single spaces"), since a map's list view already walks the
/// alternating key/value sequence in insertion order.
#[derive(Debug)]
pub(crate) struct MapAsValue(pub(crate) Arc<dyn ListTrait>);

impl ValueTrait for MapAsValue {
    fn to_string(&self, _payload: &Payload) -> String {
        let n = self.0.len();
        let mut parts = Vec::with_capacity(n);
        for i in 0..n {
            let element = self.0.index(i).expect("index within len() must not fail");
            parts.push(rt_string::escape_for_list(&element.to_string()));
        }
        parts.join(" ")
    }

    fn weight(&self, _payload: &Payload) -> usize {
        self.0.len() / 2
    }
}
