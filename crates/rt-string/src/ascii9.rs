//! The ASCII9 packed string payload: up to 9 printable-ASCII characters
//! packed 7 bits apiece into the low 63 bits of a machine word.

/// Printable ASCII only — byte 0 never occurs in a valid character, so it
/// doubles as an implicit terminator for strings shorter than 9 bytes.
fn is_packable(b: u8) -> bool {
    (0x20..=0x7E).contains(&b)
}

/// Packs `s` into a 63-bit ASCII9 word, or `None` if it's too long or
/// contains a non-printable byte.
pub fn pack(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.len() > 9 || !bytes.iter().all(|&b| is_packable(b)) {
        return None;
    }
    let mut word: u64 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        word |= (b as u64) << (7 * i);
    }
    Some(word)
}

/// Unpacks a 63-bit ASCII9 word back into its string.
pub fn unpack(word: u64) -> String {
    let mut bytes = Vec::with_capacity(9);
    for i in 0..9 {
        let b = ((word >> (7 * i)) & 0x7F) as u8;
        if b == 0 {
            break;
        }
        bytes.push(b);
    }
    // Safety of this unwrap: every packed byte is in 0x20..=0x7E by
    // construction, which is valid UTF-8.
    String::from_utf8(bytes).expect("ASCII9 payload is always printable ASCII")
}

pub fn len(word: u64) -> usize {
    for i in 0..9 {
        if ((word >> (7 * i)) & 0x7F) == 0 {
            return i;
        }
    }
    9
}

pub fn byte_at(word: u64, i: usize) -> Option<u8> {
    if i >= len(word) {
        return None;
    }
    Some(((word >> (7 * i)) & 0x7F) as u8)
}

/// A direct scramble of the payload bits, used as the string hash for
/// ASCII9 values instead of hashing the materialized string.
pub fn hash(word: u64) -> u64 {
    word.wrapping_mul(0xFF51_AFD7_ED55_8CCD).rotate_left(33)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_and_unpacks_round_trip() {
        for s in ["", "a", "hello", "123456789"] {
            let packed = pack(s).unwrap();
            assert_eq!(unpack(packed), s);
            assert_eq!(len(packed), s.len());
        }
    }

    #[test]
    fn rejects_too_long_or_non_printable() {
        assert!(pack("123456789X").is_none());
        assert!(pack("tab\there").is_none());
        assert!(pack("\u{1F600}").is_none());
    }

    #[test]
    fn byte_at_matches_source_bytes() {
        let packed = pack("abc").unwrap();
        assert_eq!(byte_at(packed, 0), Some(b'a'));
        assert_eq!(byte_at(packed, 2), Some(b'c'));
        assert_eq!(byte_at(packed, 3), None);
    }
}
