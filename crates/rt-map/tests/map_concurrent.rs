//! Multi-threaded properties a persistent map must hold (§8): concurrent
//! readers of a shared map value always see a consistent view, and two
//! writers `add`-ing onto the same base value end up with two independent
//! results, neither aware of the other's write.

use std::sync::Arc;
use std::thread;

use rt_value::Value;

fn pair(k: &str, v: &str) -> (Value, Value) {
    (rt_string::of_str(k), rt_string::of_str(v))
}

#[test]
fn concurrent_readers_agree_on_a_shared_hash_map() {
    let mut pairs = Vec::new();
    for i in 0..40 {
        pairs.push(pair(&format!("key{i}"), &format!("val{i}")));
    }
    let base = Arc::new(rt_map::of_pairs(pairs));

    let mut readers = Vec::new();
    for _ in 0..8 {
        let base = base.clone();
        readers.push(thread::spawn(move || {
            let map_trait = base.map_of().unwrap();
            for i in 0..40 {
                let key = rt_string::of_str(&format!("key{i}"));
                let c = map_trait.find(&key);
                assert!(c.is_some());
                assert_eq!(map_trait.get_value(c).to_string(), format!("val{i}"));
            }
        }));
    }
    for r in readers {
        r.join().unwrap();
    }
}

#[test]
fn two_writers_adding_onto_one_base_fork_into_independent_maps() {
    let base = rt_map::of_pairs(vec![pair("a", "1"), pair("b", "2")]);

    let base_a = base.clone();
    let base_b = base.clone();

    let handle_a = thread::spawn(move || base_a.map_of().unwrap().add(rt_string::of_str("c"), rt_string::of_str("from-a")));
    let handle_b = thread::spawn(move || base_b.map_of().unwrap().add(rt_string::of_str("c"), rt_string::of_str("from-b")));

    let result_a = handle_a.join().unwrap();
    let result_b = handle_b.join().unwrap();

    let a_trait = result_a.map_of().unwrap();
    let b_trait = result_b.map_of().unwrap();
    let key = rt_string::of_str("c");
    assert_eq!(a_trait.get_value(a_trait.find(&key)).to_string(), "from-a");
    assert_eq!(b_trait.get_value(b_trait.find(&key)).to_string(), "from-b");

    // the shared base is untouched by either fork.
    assert_eq!(base.map_of().unwrap().npairs(), 2);
}

#[test]
fn concurrent_adds_from_many_threads_each_preserve_the_original_pairs() {
    let base = Arc::new(rt_map::of_pairs(vec![pair("a", "1"), pair("b", "2")]));

    let mut handles = Vec::new();
    for t in 0..8 {
        let base = base.clone();
        handles.push(thread::spawn(move || {
            base.map_of()
                .unwrap()
                .add(rt_string::of_str(&format!("t{t}")), rt_string::of_str(&format!("v{t}")))
        }));
    }

    for (t, h) in handles.into_iter().enumerate() {
        let grown = h.join().unwrap();
        let map_trait = grown.map_of().unwrap();
        assert_eq!(map_trait.npairs(), 3);
        assert_eq!(
            map_trait.get_value(map_trait.find(&rt_string::of_str(&format!("t{t}")))).to_string(),
            format!("v{t}")
        );
        assert_eq!(map_trait.get_value(map_trait.find(&rt_string::of_str("a"))).to_string(), "1");
        assert_eq!(map_trait.get_value(map_trait.find(&rt_string::of_str("b"))).to_string(), "2");
    }
}
