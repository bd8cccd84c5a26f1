use std::any::Any;

use rt_util::error::UserError;
use rt_value::{Cursor, ListTrait, MapTrait, Value};

use crate::build::from_pairs;

/// The map with no pairs. Like `rt-list`'s `EmptyList`, carries no payload
/// beyond its attribute pointer; every `find` misses and every cursor
/// operation is a programmer error (§4.5's "attempting get/set/delete on
/// `none` is undefined").
#[derive(Debug, Default)]
pub(crate) struct EmptyMap;

impl MapTrait for EmptyMap {
    fn npairs(&self) -> usize {
        0
    }

    fn find(&self, _key: &Value) -> Cursor {
        Cursor::NONE
    }

    fn next(&self, _cursor: Cursor) -> Cursor {
        Cursor::NONE
    }

    fn get_key(&self, _cursor: Cursor) -> Value {
        panic!("get_key on an empty map's `none` cursor")
    }

    fn get_value(&self, _cursor: Cursor) -> Value {
        panic!("get_value on an empty map's `none` cursor")
    }

    fn set(&self, _cursor: Cursor, _value: Value) -> Value {
        panic!("set on an empty map's `none` cursor")
    }

    fn add(&self, key: Value, value: Value) -> Value {
        from_pairs(vec![(key, value)])
    }

    fn delete(&self, _cursor: Cursor) -> Value {
        panic!("delete on an empty map's `none` cursor")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ListTrait for EmptyMap {
    fn len(&self) -> usize {
        0
    }

    fn index(&self, i: usize) -> Result<Value, UserError> {
        Err(UserError::index_out_of_bounds(i, 0))
    }

    fn slice(&self, lo: usize, hi: usize) -> Result<Value, UserError> {
        if lo == 0 && hi == 0 {
            Ok(rt_list::empty())
        } else {
            Err(UserError::index_out_of_bounds(hi, 0))
        }
    }

    fn append(&self, v: Value) -> Value {
        rt_list::empty().list_of().expect("list").append(v)
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
