use std::any::Any;
use std::sync::Arc;

use rt_util::error::UserError;
use rt_value::{ListTrait, Value};

use crate::build::from_values;
use crate::node::list_value;

/// The list with no elements. A singleton in spirit — every `of_values(&[])`
/// call produces a fresh one, but they're all interchangeable since there's
/// no payload to distinguish.
#[derive(Debug, Default)]
pub(crate) struct EmptyList;

impl ListTrait for EmptyList {
    fn len(&self) -> usize {
        0
    }

    fn index(&self, i: usize) -> Result<Value, UserError> {
        Err(UserError::index_out_of_bounds(i, 0))
    }

    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo == 0 && hi == 0 {
            Ok(list_value(Arc::new(EmptyList)))
        } else {
            Err(UserError::index_out_of_bounds(hi, 0))
        }
    }

    fn append(&self, v: Value) -> Value {
        from_values(vec![v])
    }

    fn concat(&self, other: &Value) -> Result<Value, UserError> {
        other.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
        Ok(other.clone())
    }

    fn remove(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        self.slice(lo, hi)
    }

    fn set(&self, i: usize, _v: Value) -> Result<Value, UserError> {
        Err(UserError::index_out_of_bounds(i, 0))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A flat, eagerly-materialized list of up to [`crate::consts::ARRAY_THRESHOLD`]
/// elements. Every operation copies — cheap at this size, and it keeps
/// small lists free of the persistent-vector machinery packed-lists need.
#[derive(Debug)]
pub(crate) struct ArrayList {
    elements: Vec<Value>,
}

impl ArrayList {
    pub(crate) fn new(elements: Vec<Value>) -> Self {
        Self { elements }
    }
}

impl ListTrait for ArrayList {
    fn len(&self) -> usize {
        self.elements.len()
    }

    fn index(&self, i: usize) -> Result<Value, UserError> {
        self.elements
            .get(i)
            .cloned()
            .ok_or_else(|| UserError::index_out_of_bounds(i, self.elements.len()))
    }

    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.elements.len() {
            return Err(UserError::index_out_of_bounds(hi, self.elements.len()));
        }
        Ok(from_values(self.elements[lo..hi].to_vec()))
    }

    fn append(&self, v: Value) -> Value {
        let mut next = self.elements.clone();
        next.push(v);
        from_values(next)
    }

    fn concat(&self, other: &Value) -> Result<Value, UserError> {
        let other_list = other.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
        let mut next = self.elements.clone();
        for i in 0..other_list.len() {
            next.push(other_list.index(i)?);
        }
        Ok(from_values(next))
    }

    fn remove(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.elements.len() {
            return Err(UserError::index_out_of_bounds(hi, self.elements.len()));
        }
        let mut next = self.elements[..lo].to_vec();
        next.extend_from_slice(&self.elements[hi..]);
        Ok(from_values(next))
    }

    fn set(&self, i: usize, v: Value) -> Result<Value, UserError> {
        if i >= self.elements.len() {
            return Err(UserError::index_out_of_bounds(i, self.elements.len()));
        }
        let mut next = self.elements.clone();
        next[i] = v;
        Ok(from_values(next))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
