use std::any::Any;
use std::sync::Arc;

use rt_util::error::UserError;
use rt_value::attr::AttrNode;
use rt_value::payload::Payload;
use rt_value::{ListTrait, Value};

use rt_pvec::PvRef;

use crate::build::from_values;
use crate::consts::ARRAY_THRESHOLD;
use crate::node::list_value;

/// Whether `payload`, under `attr`, is losslessly reconstructable from one
/// raw 64-bit word — true for the built-in integer/real/ASCII9-string
/// singleton attributes (`rt_value::integer_attr`/`real_attr`,
/// `rt_string::string_attr`), false for anything backed by a heap
/// reference (a rope, a nested list or map, a pointer target, …).
fn payload_word_of(attr: &Arc<AttrNode>, payload: &Payload) -> Option<u64> {
    if Arc::ptr_eq(attr, &rt_value::integer_attr()) || Arc::ptr_eq(attr, &rt_value::real_attr()) {
        payload.as_uint()
    } else if Arc::ptr_eq(attr, &rt_string::string_attr()) {
        payload.as_ascii9()
    } else {
        None
    }
}

/// Inverse of [`payload_word_of`]: rebuilds the payload variant a stored
/// word came from, using the slot's own attribute to decide which.
fn payload_from_word(attr: &Arc<AttrNode>, word: u64) -> Payload {
    if Arc::ptr_eq(attr, &rt_string::string_attr()) {
        Payload::Ascii9(word)
    } else {
        Payload::Uint(word)
    }
}

/// Per-slot attribute storage (§4.4's attribute-pointer mask bit): `Mono`
/// while every element shares the template's attribute pointer — nothing
/// stored beyond the template itself — or `Divergent` once any element's
/// attribute differs, storing one pointer-sized `Arc<AttrNode>` per slot.
#[derive(Debug, Clone)]
enum AttrStorage {
    Mono,
    Divergent(PvRef<Arc<AttrNode>>),
}

/// Per-slot payload storage (§4.4's payload mask bit), with an extra tier
/// between "nothing stored" and "store the whole thing": `Word` covers the
/// common case where every element's payload is still reconstructable as
/// one raw 64-bit word via its own attribute, so an element can validly
/// carry a different *kind* of word than the template (an integer next to
/// a packed string) without losing compactness — the attribute already on
/// file for that slot says how to decode it. `Full` is the fallback for
/// anything that doesn't fit in a word.
#[derive(Debug, Clone)]
enum PayloadStorage {
    Mono,
    Word(PvRef<u64>),
    Full(PvRef<Payload>),
}

/// A persistent-vector-backed list that physically omits storage for
/// fields that haven't diverged from the first element appended (the
/// *template*). Reading any slot reconstructs its attribute and payload
/// from whichever tier backs them; appending or setting a value upgrades a
/// tier only when that particular value forces it to (§4.4).
#[derive(Debug)]
pub(crate) struct PackedList {
    template_attr: Arc<AttrNode>,
    template_payload: Payload,
    len: usize,
    attrs: AttrStorage,
    payloads: PayloadStorage,
}

impl PackedList {
    pub(crate) fn new(elements: Vec<Value>) -> Self {
        let template_attr = elements[0].attr().clone();
        let template_payload = elements[0].payload().clone();
        let len = elements.len();

        let attrs = if elements.iter().all(|e| Arc::ptr_eq(e.attr(), &template_attr)) {
            AttrStorage::Mono
        } else {
            AttrStorage::Divergent(PvRef::new(elements.iter().map(|e| e.attr().clone()).collect()))
        };

        let payloads = if elements.iter().all(|e| e.payload().identical(&template_payload)) {
            PayloadStorage::Mono
        } else if let Some(words) = elements
            .iter()
            .map(|e| payload_word_of(e.attr(), e.payload()))
            .collect::<Option<Vec<u64>>>()
        {
            PayloadStorage::Word(PvRef::new(words))
        } else {
            PayloadStorage::Full(PvRef::new(elements.iter().map(|e| e.payload().clone()).collect()))
        };

        Self { template_attr, template_payload, len, attrs, payloads }
    }

    fn from_parts(
        template_attr: Arc<AttrNode>,
        template_payload: Payload,
        len: usize,
        attrs: AttrStorage,
        payloads: PayloadStorage,
    ) -> Self {
        Self { template_attr, template_payload, len, attrs, payloads }
    }

    fn attr_at(&self, i: usize) -> Arc<AttrNode> {
        match &self.attrs {
            AttrStorage::Mono => self.template_attr.clone(),
            AttrStorage::Divergent(pv) => pv.with_read(|s| s[i].clone()),
        }
    }

    fn payload_at(&self, i: usize) -> Payload {
        match &self.payloads {
            PayloadStorage::Mono => self.template_payload.clone(),
            PayloadStorage::Word(pv) => {
                let attr = self.attr_at(i);
                let word = pv.with_read(|s| s[i]);
                payload_from_word(&attr, word)
            }
            PayloadStorage::Full(pv) => pv.with_read(|s| s[i].clone()),
        }
    }

    fn value_at(&self, i: usize) -> Value {
        Value::new(self.attr_at(i), self.payload_at(i))
    }

    /// The per-element byte cost this list currently pays beyond its
    /// template — `0` while everything stays monomorphic, growing by one
    /// machine word per field that has diverged (§8's representation
    /// properties). Exposed for tests; not part of `ListTrait`.
    #[cfg(test)]
    pub(crate) fn storage_bytes_per_element(&self) -> usize {
        let attr_word = match self.attrs {
            AttrStorage::Mono => 0,
            AttrStorage::Divergent(_) => std::mem::size_of::<Arc<AttrNode>>(),
        };
        let payload_word = match self.payloads {
            PayloadStorage::Mono => 0,
            PayloadStorage::Word(_) => std::mem::size_of::<u64>(),
            PayloadStorage::Full(_) => std::mem::size_of::<Payload>(),
        };
        attr_word + payload_word
    }

    fn attrs_with_appended(&self, v: &Value) -> AttrStorage {
        match &self.attrs {
            AttrStorage::Mono if Arc::ptr_eq(v.attr(), &self.template_attr) => AttrStorage::Mono,
            AttrStorage::Mono => {
                let backfill: Vec<Arc<AttrNode>> = std::iter::repeat(self.template_attr.clone())
                    .take(self.len)
                    .chain(std::iter::once(v.attr().clone()))
                    .collect();
                AttrStorage::Divergent(PvRef::new(backfill))
            }
            AttrStorage::Divergent(pv) => AttrStorage::Divergent(pv.append(std::slice::from_ref(v.attr()))),
        }
    }

    fn payloads_with_appended(&self, v: &Value) -> PayloadStorage {
        match &self.payloads {
            PayloadStorage::Mono if v.payload().identical(&self.template_payload) => PayloadStorage::Mono,
            PayloadStorage::Mono => {
                if let (Some(template_word), Some(word)) = (
                    payload_word_of(&self.template_attr, &self.template_payload),
                    payload_word_of(v.attr(), v.payload()),
                ) {
                    let backfill: Vec<u64> = std::iter::repeat(template_word)
                        .take(self.len)
                        .chain(std::iter::once(word))
                        .collect();
                    PayloadStorage::Word(PvRef::new(backfill))
                } else {
                    let backfill: Vec<Payload> = std::iter::repeat(self.template_payload.clone())
                        .take(self.len)
                        .chain(std::iter::once(v.payload().clone()))
                        .collect();
                    PayloadStorage::Full(PvRef::new(backfill))
                }
            }
            PayloadStorage::Word(pv) => {
                if let Some(word) = payload_word_of(v.attr(), v.payload()) {
                    PayloadStorage::Word(pv.append(&[word]))
                } else {
                    let mut full: Vec<Payload> = (0..self.len).map(|i| self.payload_at(i)).collect();
                    full.push(v.payload().clone());
                    PayloadStorage::Full(PvRef::new(full))
                }
            }
            PayloadStorage::Full(pv) => PayloadStorage::Full(pv.append(std::slice::from_ref(v.payload()))),
        }
    }

    fn attrs_with_override(&self, i: usize, v: &Value) -> AttrStorage {
        match &self.attrs {
            AttrStorage::Mono if Arc::ptr_eq(v.attr(), &self.template_attr) => AttrStorage::Mono,
            AttrStorage::Mono => {
                let mut backfill: Vec<Arc<AttrNode>> =
                    std::iter::repeat(self.template_attr.clone()).take(self.len).collect();
                backfill[i] = v.attr().clone();
                AttrStorage::Divergent(PvRef::new(backfill))
            }
            AttrStorage::Divergent(pv) => {
                AttrStorage::Divergent(pv.set(i, v.attr().clone()).expect("index already bounds-checked"))
            }
        }
    }

    fn payloads_with_override(&self, i: usize, v: &Value) -> PayloadStorage {
        match &self.payloads {
            PayloadStorage::Mono if v.payload().identical(&self.template_payload) => PayloadStorage::Mono,
            PayloadStorage::Mono => {
                if let (Some(template_word), Some(word)) = (
                    payload_word_of(&self.template_attr, &self.template_payload),
                    payload_word_of(v.attr(), v.payload()),
                ) {
                    let mut backfill: Vec<u64> = std::iter::repeat(template_word).take(self.len).collect();
                    backfill[i] = word;
                    PayloadStorage::Word(PvRef::new(backfill))
                } else {
                    let mut backfill: Vec<Payload> =
                        std::iter::repeat(self.template_payload.clone()).take(self.len).collect();
                    backfill[i] = v.payload().clone();
                    PayloadStorage::Full(PvRef::new(backfill))
                }
            }
            PayloadStorage::Word(pv) => {
                if let Some(word) = payload_word_of(v.attr(), v.payload()) {
                    PayloadStorage::Word(pv.set(i, word).expect("index already bounds-checked"))
                } else {
                    let mut full: Vec<Payload> = (0..self.len).map(|j| self.payload_at(j)).collect();
                    full[i] = v.payload().clone();
                    PayloadStorage::Full(PvRef::new(full))
                }
            }
            PayloadStorage::Full(pv) => {
                PayloadStorage::Full(pv.set(i, v.payload().clone()).expect("index already bounds-checked"))
            }
        }
    }
}

impl ListTrait for PackedList {
    fn len(&self) -> usize {
        self.len
    }

    fn index(&self, i: usize) -> Result<Value, UserError> {
        if i >= self.len {
            return Err(UserError::index_out_of_bounds(i, self.len));
        }
        Ok(self.value_at(i))
    }

    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.len {
            return Err(UserError::index_out_of_bounds(hi, self.len));
        }
        // zero-offset, at-least-half slices share every tier's persistent
        // vector with a shorter length — no copy (§4.4).
        if lo == 0 && hi * 2 >= self.len {
            let attrs = match &self.attrs {
                AttrStorage::Mono => AttrStorage::Mono,
                AttrStorage::Divergent(pv) => AttrStorage::Divergent(pv.truncated(hi)),
            };
            let payloads = match &self.payloads {
                PayloadStorage::Mono => PayloadStorage::Mono,
                PayloadStorage::Word(pv) => PayloadStorage::Word(pv.truncated(hi)),
                PayloadStorage::Full(pv) => PayloadStorage::Full(pv.truncated(hi)),
            };
            return Ok(list_value(Arc::new(PackedList::from_parts(
                self.template_attr.clone(),
                self.template_payload.clone(),
                hi,
                attrs,
                payloads,
            ))));
        }
        let elements: Vec<Value> = (lo..hi).map(|i| self.value_at(i)).collect();
        if elements.len() < ARRAY_THRESHOLD {
            Ok(from_values(elements))
        } else {
            Ok(list_value(Arc::new(PackedList::new(elements))))
        }
    }

    fn append(&self, v: Value) -> Value {
        let attrs = self.attrs_with_appended(&v);
        let payloads = self.payloads_with_appended(&v);
        list_value(Arc::new(PackedList::from_parts(
            self.template_attr.clone(),
            self.template_payload.clone(),
            self.len + 1,
            attrs,
            payloads,
        )))
    }

    fn concat(&self, other: &Value) -> Result<Value, UserError> {
        let other_list = other.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
        let mut result = list_value(Arc::new(PackedList::from_parts(
            self.template_attr.clone(),
            self.template_payload.clone(),
            self.len,
            self.attrs.clone(),
            self.payloads.clone(),
        )));
        for i in 0..other_list.len() {
            result = result.list_of().expect("still a list").append(other_list.index(i)?);
        }
        Ok(result)
    }

    fn remove(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.len {
            return Err(UserError::index_out_of_bounds(hi, self.len));
        }
        let mut elements = Vec::with_capacity(self.len - (hi - lo));
        for i in 0..lo {
            elements.push(self.value_at(i));
        }
        for i in hi..self.len {
            elements.push(self.value_at(i));
        }
        Ok(from_values(elements))
    }

    fn set(&self, i: usize, v: Value) -> Result<Value, UserError> {
        if i >= self.len {
            return Err(UserError::index_out_of_bounds(i, self.len));
        }
        let attrs = self.attrs_with_override(i, &v);
        let payloads = self.payloads_with_override(i, &v);
        Ok(list_value(Arc::new(PackedList::from_parts(
            self.template_attr.clone(),
            self.template_payload.clone(),
            self.len,
            attrs,
            payloads,
        ))))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
