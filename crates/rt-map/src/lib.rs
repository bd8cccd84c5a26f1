//! Persistent key/value containers: the empty/list-map/hash-map
//! representations behind one map contract (§4.5).
//!
//! Every map-producing operation funnels through [`build::from_pairs`] so
//! the empty/list-map/hash-map promotion rule only needs stating once.

mod build;
mod consts;
mod empty;
mod hash_map;
mod list_map;
mod node;
mod value_trait;

use std::sync::Arc;

use rt_util::error::FormatError;
use rt_value::Value;

use empty::EmptyMap;
use node::map_value;

/// Builds a map value from its pairs, in insertion order, choosing the
/// smallest representation that holds them.
pub fn of_pairs(pairs: Vec<(Value, Value)>) -> Value {
    build::from_pairs(pairs)
}

/// The map with no pairs.
pub fn empty() -> Value {
    map_value(Arc::new(EmptyMap))
}

/// Parses a map's string form: the same whitespace-separated,
/// `escape_for_list`-encoded token stream as a list, read as alternating
/// keys and values (§4.5, §6).
pub fn parse(input: &str) -> Result<Value, FormatError> {
    let list = rt_list::parse(input)?;
    let elements = list.list_of().expect("rt_list::parse always produces a list value");
    let n = elements.len();
    if n % 2 != 0 {
        return Err(FormatError::InvalidMap(input.to_string()));
    }
    let mut pairs = Vec::with_capacity(n / 2);
    for i in (0..n).step_by(2) {
        pairs.push((
            elements.index(i).expect("within len"),
            elements.index(i + 1).expect("within len"),
        ));
    }
    Ok(build::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hash_map::HashMap;
    use list_map::ListMap;
    use rt_value::Cursor;

    fn pair(k: &str, v: &str) -> (Value, Value) {
        (rt_string::of_str(k), rt_string::of_str(v))
    }

    #[test]
    fn empty_map_has_zero_pairs_and_empty_string_form() {
        let m = empty();
        assert_eq!(m.map_of().unwrap().npairs(), 0);
        assert_eq!(m.to_string(), "");
    }

    #[test]
    fn list_map_stays_list_map_under_threshold() {
        let m = of_pairs(vec![pair("a", "1"), pair("b", "2")]);
        let map_trait = m.map_of().unwrap();
        assert_eq!(map_trait.npairs(), 2);
        assert!(map_trait.as_any().downcast_ref::<ListMap>().is_some());
        assert_eq!(m.to_string(), "a 1 b 2");
    }

    #[test]
    fn add_past_threshold_promotes_to_hash_map() {
        let mut m = empty();
        for i in 0..5 {
            m = m.map_of().unwrap().add(rt_string::of_str(&format!("k{i}")), rt_string::of_str(&format!("v{i}")));
        }
        let map_trait = m.map_of().unwrap();
        assert_eq!(map_trait.npairs(), 5);
        assert!(map_trait.as_any().downcast_ref::<HashMap>().is_some());
        for i in 0..5 {
            let c = map_trait.find(&rt_string::of_str(&format!("k{i}")));
            assert!(c.is_some());
            assert_eq!(map_trait.get_value(c).to_string(), format!("v{i}"));
        }
    }

    /// Spec scenario: build a hash-map from `(foo,bar), (baz,qux),
    /// (foo,xyzzy)`; `find(foo)` reaches `bar` then `xyzzy` via `next`,
    /// then `none`; deleting the first occurrence leaves `xyzzy` findable
    /// and `npairs` at 2.
    #[test]
    fn hash_map_add_find_delete_round_trip() {
        let pairs = vec![pair("foo", "bar"), pair("baz", "qux"), pair("foo", "xyzzy")];
        let m = HashMap::build(pairs);
        let foo = rt_string::of_str("foo");

        let c1 = m.find(&foo);
        assert!(c1.is_some());
        assert_eq!(m.get_value(c1).to_string(), "bar");

        let c2 = m.next(c1);
        assert!(c2.is_some());
        assert_eq!(m.get_value(c2).to_string(), "xyzzy");

        assert_eq!(m.next(c2), Cursor::NONE);

        let deleted = m.delete(c1);
        let map_trait = deleted.map_of().unwrap();
        assert_eq!(map_trait.npairs(), 2);
        let remaining = map_trait.find(&foo);
        assert!(remaining.is_some());
        assert_eq!(map_trait.get_value(remaining).to_string(), "xyzzy");
    }

    #[test]
    fn ascii9_map_demotes_to_value_hash_on_non_ascii9_key() {
        let mut pairs = Vec::new();
        for i in 0..6 {
            pairs.push(pair(&format!("k{i}"), &format!("v{i}")));
        }
        let ascii9_map = HashMap::build(pairs.clone());
        assert!(ascii9_map.as_any().downcast_ref::<HashMap>().is_some());

        let long_key = rt_string::of_str("this-key-is-longer-than-nine-bytes");
        let grown = ascii9_map.add(long_key.clone(), rt_string::of_str("value"));
        let map_trait = grown.map_of().unwrap();
        let c = map_trait.find(&long_key);
        assert!(c.is_some());
        assert_eq!(map_trait.get_value(c).to_string(), "value");
        for (k, v) in &pairs {
            let c = map_trait.find(k);
            assert!(c.is_some());
            assert_eq!(&map_trait.get_value(c), v);
        }
    }

    #[test]
    fn vacuum_reclaims_tombstones_after_heavy_deletion() {
        let mut pairs = Vec::new();
        for i in 0..40 {
            pairs.push(pair(&format!("key{i}"), &format!("val{i}")));
        }
        let mut m = HashMap::build(pairs);
        for i in 0..25 {
            let key = rt_string::of_str(&format!("key{i}"));
            let c = m.find(&key);
            let next_value = m.delete(c);
            m = next_value
                .map_of()
                .unwrap()
                .as_any()
                .downcast_ref::<HashMap>()
                .expect("still a hash-map representation")
                .clone();
        }
        assert_eq!(m.npairs(), 15);
        for i in 25..40 {
            let key = rt_string::of_str(&format!("key{i}"));
            let c = m.find(&key);
            assert!(c.is_some(), "key{i} should survive vacuuming");
        }
        for i in 0..25 {
            let key = rt_string::of_str(&format!("key{i}"));
            assert_eq!(m.find(&key), Cursor::NONE);
        }
    }

    #[test]
    fn list_view_reports_alternating_keys_and_values() {
        let m = of_pairs(vec![pair("a", "1"), pair("b", "2"), pair("c", "3")]);
        let list = m.list_of().unwrap();
        assert_eq!(list.len(), 6);
        let rendered: Vec<String> = (0..6).map(|i| list.index(i).unwrap().to_string()).collect();
        assert_eq!(rendered, vec!["a", "1", "b", "2", "c", "3"]);
    }

    #[test]
    fn parse_reads_alternating_tokens_into_a_map() {
        let m = parse("a 1 b 2").unwrap();
        let map_trait = m.map_of().unwrap();
        assert_eq!(map_trait.npairs(), 2);
        let c = map_trait.find(&rt_string::of_str("b"));
        assert_eq!(map_trait.get_value(c).to_string(), "2");
    }

    #[test]
    fn parse_rejects_an_odd_token_count() {
        assert!(parse("a 1 b").is_err());
    }
}
