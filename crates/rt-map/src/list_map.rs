use std::any::Any;
use std::sync::Arc;

use rt_util::error::UserError;
use rt_value::{Cursor, ListTrait, MapTrait, Value};

use crate::build::from_pairs;
use crate::consts::LIST_MAP_THRESHOLD;
use crate::node::map_value;

/// A map backed by a flat, linear-scanned list of key/value pairs (§4.5).
/// Cursors are simply pair indices; cheap to construct, cheap to scan up to
/// [`LIST_MAP_THRESHOLD`] pairs, and promoted to a hash-map beyond that.
#[derive(Debug, Clone)]
pub(crate) struct ListMap {
    pairs: Vec<(Value, Value)>,
}

impl ListMap {
    pub(crate) fn new(pairs: Vec<(Value, Value)>) -> Self {
        Self { pairs }
    }

    fn find_from(&self, key: &Value, start: usize) -> Cursor {
        for i in start..self.pairs.len() {
            if self.pairs[i].0.equal(key) {
                return Cursor(i as u64);
            }
        }
        Cursor::NONE
    }
}

impl MapTrait for ListMap {
    fn npairs(&self) -> usize {
        self.pairs.len()
    }

    fn find(&self, key: &Value) -> Cursor {
        self.find_from(key, 0)
    }

    fn next(&self, cursor: Cursor) -> Cursor {
        if cursor.is_none() || cursor.0 as usize >= self.pairs.len() {
            return Cursor::NONE;
        }
        let key = self.pairs[cursor.0 as usize].0.clone();
        self.find_from(&key, cursor.0 as usize + 1)
    }

    fn get_key(&self, cursor: Cursor) -> Value {
        self.pairs[cursor.0 as usize].0.clone()
    }

    fn get_value(&self, cursor: Cursor) -> Value {
        self.pairs[cursor.0 as usize].1.clone()
    }

    fn set(&self, cursor: Cursor, value: Value) -> Value {
        let mut next = self.pairs.clone();
        next[cursor.0 as usize].1 = value;
        map_value(Arc::new(ListMap::new(next)))
    }

    fn add(&self, key: Value, value: Value) -> Value {
        let mut next = self.pairs.clone();
        next.push((key, value));
        if next.len() > LIST_MAP_THRESHOLD {
            from_pairs(next)
        } else {
            map_value(Arc::new(ListMap::new(next)))
        }
    }

    fn delete(&self, cursor: Cursor) -> Value {
        let mut next = self.pairs.clone();
        next.remove(cursor.0 as usize);
        from_pairs(next)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ListTrait for ListMap {
    fn len(&self) -> usize {
        2 * self.pairs.len()
    }

    fn index(&self, i: usize) -> Result<Value, UserError> {
        let pair = self
            .pairs
            .get(i / 2)
            .ok_or_else(|| UserError::index_out_of_bounds(i, self.len()))?;
        Ok(if i % 2 == 0 { pair.0.clone() } else { pair.1.clone() })
    }

    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.len() {
            return Err(UserError::index_out_of_bounds(hi, self.len()));
        }
        Ok(rt_list::of_values(
            (lo..hi).map(|i| self.index(i)).collect::<Result<Vec<_>, _>>()?,
        ))
    }

    fn append(&self, v: Value) -> Value {
        let mut elements: Vec<Value> = (0..self.len()).map(|i| self.index(i).expect("in bounds")).collect();
        elements.push(v);
        rt_list::of_values(elements)
    }

    fn concat(&self, other: &Value) -> Result<Value, UserError> {
        let mut elements: Vec<Value> = (0..self.len()).map(|i| self.index(i).expect("in bounds")).collect();
        let other_list = other.list_of().map_err(|e| UserError::argument_binding(e.to_string()))?;
        for i in 0..other_list.len() {
            elements.push(other_list.index(i)?);
        }
        Ok(rt_list::of_values(elements))
    }

    fn remove(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo > hi || hi > self.len() {
            return Err(UserError::index_out_of_bounds(hi, self.len()));
        }
        let mut elements = Vec::new();
        for i in 0..lo {
            elements.push(self.index(i)?);
        }
        for i in hi..self.len() {
            elements.push(self.index(i)?);
        }
        Ok(rt_list::of_values(elements))
    }

    fn set(&self, i: usize, v: Value) -> Result<Value, UserError> {
        if i >= self.len() {
            return Err(UserError::index_out_of_bounds(i, self.len()));
        }
        let mut elements: Vec<Value> = (0..self.len()).map(|j| self.index(j).expect("in bounds")).collect();
        elements[i] = v;
        Ok(rt_list::of_values(elements))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
