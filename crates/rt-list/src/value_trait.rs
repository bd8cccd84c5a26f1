use std::sync::Arc;

use rt_value::payload::Payload;
use rt_value::traits::ValueTrait;
use rt_value::ListTrait;

/// The value-trait side of every list value: computes the canonical string
/// form (§6 — `escape_for_list` of each element joined by single spaces) by
/// walking the same `ListTrait` the attribute chain's list node carries.
/// Stateful rather than payload-driven, unlike `rt-string`'s `StringValue`:
/// a list's content lives entirely behind the list trait object, so this
/// struct just holds a clone of it.
#[derive(Debug)]
pub(crate) struct ListAsValue(pub Arc<dyn ListTrait>);

impl ValueTrait for ListAsValue {
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
        self.0.len()
    }
}
