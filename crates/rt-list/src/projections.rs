use std::any::Any;
use std::sync::{Arc, OnceLock};

use rt_util::error::UserError;
use rt_value::{ListTrait, Value};

use crate::build::from_values;
use crate::node::list_value;

fn materialize(list: &dyn ListTrait) -> Result<Vec<Value>, UserError> {
    (0..list.len()).map(|i| list.index(i)).collect()
}

/// Every projection falls back to this for the operations that don't have
/// a natural lazy form (`append`, `concat`, `remove`, `set`): collect the
/// view into a concrete list, then perform the operation there. `len` and
/// `index` stay genuinely lazy on each projection below.
fn materialize_to_value(list: &dyn ListTrait) -> Result<Value, UserError> {
    Ok(from_values(materialize(list)?))
}

fn materialized_append(list: &dyn ListTrait, v: Value) -> Value {
    let concrete = materialize_to_value(list).expect("projection source is well-formed");
    concrete
        .list_of()
        .expect("materialized value is a list")
        .append(v)
}

fn materialized_concat(list: &dyn ListTrait, other: &Value) -> Result<Value, UserError> {
    let concrete = materialize_to_value(list)?;
    concrete
        .list_of()
        .map_err(|e| UserError::argument_binding(e.to_string()))?
        .concat(other)
}

fn materialized_remove(list: &dyn ListTrait, lo: usize, hi: usize) -> Result<Value, UserError> {
    let concrete = materialize_to_value(list)?;
    concrete
        .list_of()
        .map_err(|e| UserError::argument_binding(e.to_string()))?
        .remove(lo, hi)
}

fn materialized_set(list: &dyn ListTrait, i: usize, v: Value) -> Result<Value, UserError> {
    let concrete = materialize_to_value(list)?;
    concrete
        .list_of()
        .map_err(|e| UserError::argument_binding(e.to_string()))?
        .set(i, v)
}

/// `Interleave({L1..Lk})`: element `k*i + j` yields `Lj[i]` (§4.4).
#[derive(Debug)]
pub(crate) struct InterleaveList {
    sources: Vec<Value>,
}

impl InterleaveList {
    pub(crate) fn new(sources: Vec<Value>) -> Self {
        Self { sources }
    }

    fn source_len(&self, j: usize) -> Result<usize, UserError> {
        Ok(self.sources[j]
            .list_of()
            .map_err(|e| UserError::argument_binding(e.to_string()))?
            .len())
    }
}

impl ListTrait for InterleaveList {
    fn len(&self) -> usize {
        let k = self.sources.len();
        if k == 0 {
            return 0;
        }
        let min_len = self
            .sources
            .iter()
            .map(|s| s.list_of().map(|l| l.len()).unwrap_or(0))
            .min()
            .unwrap_or(0);
        k * min_len
    }

    fn index(&self, i: usize) -> Result<Value, UserError> {
        let k = self.sources.len();
        if k == 0 {
            return Err(UserError::index_out_of_bounds(i, 0));
        }
        let j = i % k;
        let row = i / k;
        if row >= self.source_len(j)? {
            return Err(UserError::index_out_of_bounds(i, self.len()));
        }
        self.sources[j]
            .list_of()
            .map_err(|e| UserError::argument_binding(e.to_string()))?
            .index(row)
    }

    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.len() {
            return Err(UserError::index_out_of_bounds(hi, self.len()));
        }
        Ok(from_values((lo..hi).map(|i| self.index(i)).collect::<Result<Vec<_>, _>>()?))
    }

    fn append(&self, v: Value) -> Value {
        materialized_append(self, v)
    }

    fn concat(&self, other: &Value) -> Result<Value, UserError> {
        materialized_concat(self, other)
    }

    fn remove(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        materialized_remove(self, lo, hi)
    }

    fn set(&self, i: usize, v: Value) -> Result<Value, UserError> {
        materialized_set(self, i, v)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `Demux(L, offset, stride)`: yields every `stride`-th element of `L`
/// starting at `offset` (§4.4).
#[derive(Debug)]
pub(crate) struct DemuxList {
    source: Value,
    offset: usize,
    stride: usize,
}

impl DemuxList {
    pub(crate) fn new(source: Value, offset: usize, stride: usize) -> Self {
        Self { source, offset, stride }
    }

    fn source_list(&self) -> Result<&Arc<dyn ListTrait>, UserError> {
        self.source.list_of().map_err(|e| UserError::argument_binding(e.to_string()))
    }
}

impl ListTrait for DemuxList {
    fn len(&self) -> usize {
        let source_len = match self.source_list() {
            Ok(l) => l.len(),
            Err(_) => return 0,
        };
        if self.offset >= source_len || self.stride == 0 {
            return 0;
        }
        (source_len - self.offset + self.stride - 1) / self.stride
    }

    fn index(&self, i: usize) -> Result<Value, UserError> {
        if i >= self.len() {
            return Err(UserError::index_out_of_bounds(i, self.len()));
        }
        self.source_list()?.index(self.offset + i * self.stride)
    }

    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.len() {
            return Err(UserError::index_out_of_bounds(hi, self.len()));
        }
        Ok(from_values((lo..hi).map(|i| self.index(i)).collect::<Result<Vec<_>, _>>()?))
    }

    fn append(&self, v: Value) -> Value {
        materialized_append(self, v)
    }

    fn concat(&self, other: &Value) -> Result<Value, UserError> {
        materialized_concat(self, other)
    }

    fn remove(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        materialized_remove(self, lo, hi)
    }

    fn set(&self, i: usize, v: Value) -> Result<Value, UserError> {
        materialized_set(self, i, v)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shared state behind a `Group` projection, kept separate from `GroupList`
/// so `flatten` can hold a backlink to it without holding the whole
/// (possibly large) memoization cache alive.
#[derive(Debug)]
pub(crate) struct GroupState {
    pub(crate) source: Value,
    pub(crate) group_size: usize,
}

/// `Group(L, n)`: yields sublists of length `n` (the last may be shorter);
/// each sublist is memoized per index the first time it's asked for (§4.4,
/// §5 — "release-store caching"; `OnceLock` gives the same
/// write-once-then-freely-read semantics in safe Rust).
#[derive(Debug)]
pub(crate) struct GroupList {
    pub(crate) state: Arc<GroupState>,
    cache: Vec<OnceLock<Value>>,
}

impl GroupList {
    pub(crate) fn new(source: Value, group_size: usize) -> Result<Self, UserError> {
        if group_size == 0 {
            return Err(UserError::argument_binding("group size must be positive"));
        }
        let source_len = source
            .list_of()
            .map_err(|e| UserError::argument_binding(e.to_string()))?
            .len();
        let n_groups = (source_len + group_size - 1) / group_size;
        Ok(Self {
            state: Arc::new(GroupState { source, group_size }),
            cache: (0..n_groups).map(|_| OnceLock::new()).collect(),
        })
    }
}

impl ListTrait for GroupList {
    fn len(&self) -> usize {
        self.cache.len()
    }

    fn index(&self, i: usize) -> Result<Value, UserError> {
        let slot = self
            .cache
            .get(i)
            .ok_or_else(|| UserError::index_out_of_bounds(i, self.cache.len()))?;
        if let Some(v) = slot.get() {
            return Ok(v.clone());
        }
        let source_list = self
            .state
            .source
            .list_of()
            .map_err(|e| UserError::argument_binding(e.to_string()))?;
        let lo = i * self.state.group_size;
        let hi = (lo + self.state.group_size).min(source_list.len());
        let sublist = source_list.slice(lo, hi)?;
        Ok(slot.get_or_init(|| sublist).clone())
    }

    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.len() {
            return Err(UserError::index_out_of_bounds(hi, self.len()));
        }
        Ok(from_values((lo..hi).map(|i| self.index(i)).collect::<Result<Vec<_>, _>>()?))
    }

    fn append(&self, v: Value) -> Value {
        materialized_append(self, v)
    }

    fn concat(&self, other: &Value) -> Result<Value, UserError> {
        materialized_concat(self, other)
    }

    fn remove(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        materialized_remove(self, lo, hi)
    }

    fn set(&self, i: usize, v: Value) -> Result<Value, UserError> {
        materialized_set(self, i, v)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn interleave(sources: Vec<Value>) -> Result<Value, UserError> {
    for s in &sources {
        s.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
    }
    Ok(list_value(Arc::new(InterleaveList::new(sources))))
}

pub(crate) fn demux(source: Value, offset: usize, stride: usize) -> Result<Value, UserError> {
    source.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
    if stride == 0 {
        return Err(UserError::argument_binding("demux stride must be positive"));
    }
    Ok(list_value(Arc::new(DemuxList::new(source, offset, stride))))
}

pub(crate) fn group(source: Value, n: usize) -> Result<Value, UserError> {
    Ok(list_value(Arc::new(GroupList::new(source, n)?)))
}

/// `Flatten(L)`: concatenates `L[0], L[1], …`. When `L` is exactly a
/// `Group`'s output, this is the O(1) inverse (§4.4's inversion law);
/// otherwise it's a plain concatenation of every sublist.
pub(crate) fn flatten(source: Value) -> Result<Value, UserError> {
    let list = source.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
    if let Some(group) = list.as_any().downcast_ref::<GroupList>() {
        return Ok(group.state.source.clone());
    }
    let mut elements = Vec::new();
    for i in 0..list.len() {
        let sub = list.index(i)?;
        let sub_list = sub.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
        for j in 0..sub_list.len() {
            elements.push(sub_list.index(j)?);
        }
    }
    Ok(from_values(elements))
}
