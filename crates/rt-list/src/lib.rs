//! Persistent ordered containers: the empty/array/packed list
//! representations, their four lazy projections, and the parser/printer
//! pair for a list's string form (§4.4).
//!
//! Every list-producing operation funnels through [`build::from_values`]
//! so the empty/array/packed promotion rule (§4.4) only needs stating
//! once; callers never see which representation backs a given value.

mod array;
mod build;
mod consts;
mod node;
mod packed;
mod parse;
mod projections;
mod value_trait;

use std::sync::Arc;

use rt_util::error::{FormatError, UserError};
use rt_value::Value;

use array::EmptyList;
use node::list_value;

/// Builds a list value from its elements, choosing the smallest
/// representation that holds them (empty, array-list, or packed-list).
pub fn of_values(values: Vec<Value>) -> Value {
    build::from_values(values)
}

/// The list with no elements.
pub fn empty() -> Value {
    list_value(Arc::new(EmptyList))
}

/// Parses a list's string form (§4.4, §6): whitespace-separated tokens,
/// each `escape_for_list`'s inverse.
pub fn parse(input: &str) -> Result<Value, FormatError> {
    parse::parse(input)
}

/// `Interleave({L1..Lk})`: element `k*i + j` yields `Lj[i]`.
pub fn interleave(sources: Vec<Value>) -> Result<Value, UserError> {
    projections::interleave(sources)
}

/// `Demux(L, offset, stride)`: every `stride`-th element of `L` starting
/// at `offset`.
pub fn demux(source: Value, offset: usize, stride: usize) -> Result<Value, UserError> {
    projections::demux(source, offset, stride)
}

/// `Group(L, n)`: sublists of length `n` (the last may be shorter),
/// memoized per index on first read.
pub fn group(source: Value, n: usize) -> Result<Value, UserError> {
    projections::group(source, n)
}

/// `Flatten(L)`: concatenates `L[0], L[1], …`; inverts `group` in O(1)
/// when `L` is exactly a group's output.
pub fn flatten(source: Value) -> Result<Value, UserError> {
    projections::flatten(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rt_value::convert::value_of_integer;

    fn int_list(values: &[i64]) -> Value {
        of_values(values.iter().map(|&i| value_of_integer(i)).collect())
    }

    #[test]
    fn empty_list_has_zero_length_and_empty_string_form() {
        let v = empty();
        assert_eq!(v.list_of().unwrap().len(), 0);
        assert_eq!(v.to_string(), "");
    }

    #[test]
    fn array_list_stays_array_under_threshold() {
        let v = int_list(&[1, 2, 3]);
        assert_eq!(v.list_of().unwrap().len(), 3);
        assert_eq!(v.to_string(), "1 2 3");
    }

    #[test]
    fn append_past_threshold_promotes_to_packed() {
        let mut v = of_values(vec![value_of_integer(42)]);
        for _ in 0..255 {
            v = v.list_of().unwrap().append(value_of_integer(42));
        }
        assert_eq!(v.list_of().unwrap().len(), 256);
        let last = v.list_of().unwrap().index(255).unwrap();
        assert_eq!(last.to_string(), "42");

        // §8 representation property: appending identical values costs
        // zero bytes of per-element storage beyond the template.
        let packed = v
            .list_of()
            .unwrap()
            .as_any()
            .downcast_ref::<crate::packed::PackedList>()
            .expect("256 identical integers promote to a packed-list");
        assert_eq!(packed.storage_bytes_per_element(), 0);
    }

    #[test]
    fn set_after_promotion_keeps_length_and_changes_only_target() {
        let mut v = of_values(vec![value_of_integer(42)]);
        for _ in 0..255 {
            v = v.list_of().unwrap().append(value_of_integer(42));
        }
        let updated = v.list_of().unwrap().set(0, rt_string::of_str("hello")).unwrap();
        assert_eq!(updated.list_of().unwrap().len(), 256);
        assert_eq!(updated.list_of().unwrap().index(0).unwrap().to_string(), "hello");
        assert_eq!(updated.list_of().unwrap().index(1).unwrap().to_string(), "42");

        // §8 scenario 2: setting one element to a differently-kinded value
        // (here, also a different attribute) grows storage from zero to at
        // least one machine word per slot — it no longer shares the template.
        let packed = updated
            .list_of()
            .unwrap()
            .as_any()
            .downcast_ref::<crate::packed::PackedList>()
            .expect("set on a packed list stays packed");
        assert!(packed.storage_bytes_per_element() >= std::mem::size_of::<u64>());
    }

    #[test]
    fn appending_a_differing_integer_costs_exactly_one_word() {
        let mut v = of_values(vec![value_of_integer(42)]);
        for _ in 0..254 {
            v = v.list_of().unwrap().append(value_of_integer(42));
        }
        v = v.list_of().unwrap().append(value_of_integer(7));
        assert_eq!(v.list_of().unwrap().len(), 256);

        // §8 representation property: differing only in payload (same
        // attribute, same word-sized representation) costs exactly one word.
        let packed = v
            .list_of()
            .unwrap()
            .as_any()
            .downcast_ref::<crate::packed::PackedList>()
            .expect("still a packed-list");
        assert_eq!(packed.storage_bytes_per_element(), std::mem::size_of::<u64>());
        assert_eq!(v.list_of().unwrap().index(255).unwrap().to_string(), "7");
    }

    #[test]
    fn zero_offset_slice_shares_the_packed_backing() {
        let values: Vec<Value> = (0..64i64).map(value_of_integer).collect();
        let v = of_values(values);
        let prefix = v.list_of().unwrap().slice(0, 40).unwrap();
        assert_eq!(prefix.list_of().unwrap().len(), 40);
        assert_eq!(prefix.list_of().unwrap().index(39).unwrap().to_string(), "39");
    }

    #[test]
    fn interleave_zips_sources_round_robin() {
        let a = int_list(&[1, 3, 5]);
        let b = int_list(&[2, 4, 6]);
        let zipped = interleave(vec![a, b]).unwrap();
        let list = zipped.list_of().unwrap();
        assert_eq!(list.len(), 6);
        let rendered: Vec<String> = (0..6).map(|i| list.index(i).unwrap().to_string()).collect();
        assert_eq!(rendered, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn demux_picks_every_stride_th_element() {
        let source = int_list(&[0, 1, 2, 3, 4, 5, 6, 7]);
        let evens = demux(source, 0, 2).unwrap();
        let list = evens.list_of().unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.index(2).unwrap().to_string(), "4");
    }

    #[test]
    fn group_chunks_and_flatten_inverts_it() {
        let source = int_list(&[0, 1, 2, 3, 4, 5, 6]);
        let grouped = group(source.clone(), 3).unwrap();
        let list = grouped.list_of().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.index(0).unwrap().to_string(), "0 1 2");
        assert_eq!(list.index(2).unwrap().to_string(), "6");

        let inverted = flatten(grouped).unwrap();
        assert!(inverted.equal(&source));
    }

    #[test]
    fn flatten_concatenates_an_arbitrary_list_of_lists() {
        let a = int_list(&[1, 2]);
        let b = int_list(&[3, 4, 5]);
        let outer = of_values(vec![a, b]);
        let flat = flatten(outer).unwrap();
        assert_eq!(flat.to_string(), "1 2 3 4 5");
    }
}
