use std::sync::{Arc, OnceLock};

use rt_util::error::FormatError;

use crate::attr::{AttrKind, AttrNode};
use crate::payload::Payload;
use crate::traits::ValueTrait;
use crate::value::Value;

/// The value trait backing plain integers: string form is decimal, hash is
/// a direct scramble of the payload bits rather than a string hash.
#[derive(Debug)]
struct IntegerValue;

impl ValueTrait for IntegerValue {
    fn to_string(&self, payload: &Payload) -> String {
        let bits = payload.as_uint().expect("integer payload");
        (bits as i64).to_string()
    }

    fn hash(&self, payload: &Payload) -> u64 {
        let bits = payload.as_uint().expect("integer payload");
        // Same fast scramble used for ASCII9 strings: integers are compared
        // and hashed far more often than their string forms actually need
        // to be materialized.
        bits.wrapping_mul(0x9E3779B97F4A7C15).rotate_left(31)
    }

    fn weight(&self, _payload: &Payload) -> usize {
        8
    }
}

/// The value trait backing reals (IEEE-754 doubles). String form follows
/// the same grammar `real_of` accepts, so round-tripping is exact modulo
/// the usual floating-point caveats.
#[derive(Debug)]
struct RealValue;

impl ValueTrait for RealValue {
    fn to_string(&self, payload: &Payload) -> String {
        let bits = payload.as_uint().expect("real payload");
        let f = f64::from_bits(bits);
        format_real(f)
    }

    fn weight(&self, _payload: &Payload) -> usize {
        8
    }
}

fn format_real(f: f64) -> String {
    if f == f.trunc() && f.is_finite() && f.abs() < 1e17 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

/// The integer attribute node, shared process-wide. Every integer value's
/// attribute chain head is `Arc::ptr_eq` to every other — callers that
/// compare attribute pointers (the packed-list representation's
/// polymorphism check, §4.4) see "same kind" rather than "same kind by
/// coincidence of a fresh allocation".
pub fn integer_attr() -> Arc<AttrNode> {
    static NODE: OnceLock<Arc<AttrNode>> = OnceLock::new();
    NODE.get_or_init(|| AttrNode::new(AttrKind::Value(Arc::new(IntegerValue)), None))
        .clone()
}

/// The real attribute node, shared process-wide (see [`integer_attr`]).
pub fn real_attr() -> Arc<AttrNode> {
    static NODE: OnceLock<Arc<AttrNode>> = OnceLock::new();
    NODE.get_or_init(|| AttrNode::new(AttrKind::Value(Arc::new(RealValue)), None))
        .clone()
}

/// Constructs an integer value (supplemented from `avast.c`'s
/// `value_of_integer`).
pub fn value_of_integer(i: i64) -> Value {
    Value::new(integer_attr(), Payload::Uint(i as u64))
}

/// Constructs a real value (`avast.c`'s `value_of_real`).
pub fn value_of_real(f: f64) -> Value {
    Value::new(real_attr(), Payload::Uint(f.to_bits()))
}

/// §4.1 `integer_of`: converts a value's string form to a signed 64-bit
/// integer per §6's integer grammar, additionally recognizing the keyword
/// literals `true` (1), `false`/`null` (0).
pub fn integer_of(v: &Value) -> Result<i64, FormatError> {
    parse_integer(&v.to_string())
}

/// §4.1 `real_of`: accepts integer syntax plus the C99 `strtod` grammar,
/// locale-independent, with `,` accepted as an equivalent to `.`.
pub fn real_of(v: &Value) -> Result<f64, FormatError> {
    parse_real(&v.to_string())
}

pub fn parse_integer(raw: &str) -> Result<i64, FormatError> {
    let s = raw.trim();
    match s {
        "true" => return Ok(1),
        "false" | "null" => return Ok(0),
        _ => {}
    }
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1i64, &s[1..]),
        Some(b'-') => (-1i64, &s[1..]),
        _ => (1i64, s),
    };
    if rest.is_empty() {
        return Err(FormatError::InvalidInteger(raw.to_string()));
    }
    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16u32, hex)
    } else if let Some(bin) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2u32, bin)
    } else if let Some(oct) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (8u32, oct)
    } else {
        (10u32, rest)
    };
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if cleaned.is_empty() {
        return Err(FormatError::InvalidInteger(raw.to_string()));
    }
    let magnitude = u64::from_str_radix(&cleaned, radix)
        .map_err(|_| FormatError::InvalidInteger(raw.to_string()))?;
    Ok(sign * magnitude as i64)
}

pub fn parse_real(raw: &str) -> Result<f64, FormatError> {
    let s = raw.trim();
    if let Ok(i) = parse_integer(s) {
        return Ok(i as f64);
    }
    let normalized = s.replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| FormatError::InvalidReal(raw.to_string()))
}

/// Resolves Open Question #1 (§9): the original's `integer__mod` fixes a
/// sign bias with a signed arithmetic-shift trick. This tests the divisor's
/// sign explicitly to compute a true floor-mod instead.
pub fn integer_mod(a: i64, b: i64) -> Option<i64> {
    if b == 0 {
        return None;
    }
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        Some(r + b)
    } else {
        Some(r)
    }
}
