//! String values: a compact inline ASCII9 form for short printable-ASCII
//! strings, and a rope for everything else.
//!
//! Both representations satisfy the same value trait ([`StringValue`]);
//! which one backs a given value is an implementation detail callers never
//! need to branch on — `of_str`/`of_bytes` pick automatically, and every
//! operation in [`ops`] dispatches on the payload itself.

pub mod ascii9;
pub mod ops;
pub mod rope;

pub use ops::{
    bytes_of, concat, escape_for_list, index, iterate_chunks, len, of_bytes, of_cstring, of_str,
    slice, string_attr, unescape_element, Chunks, StringValue,
};
pub use rope::RopeNode;

pub(crate) fn hash_bytes(bytes: &[u8]) -> u64 {
    const SEED: u64 = 0x51_7c_c1_b7_27_22_0a_95;
    let mut hash: u64 = 0;
    for chunk in bytes.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        let w = u64::from_le_bytes(word);
        hash = (hash.rotate_left(5) ^ w).wrapping_mul(SEED);
    }
    hash ^ (bytes.len() as u64)
}
