use rt_util::error::FormatError;
use rt_value::Value;

use crate::build::from_values;

/// Parses a list's string form: whitespace-separated tokens, each either a
/// bare word, a double-quoted span, or a verbatim `\{…\}` span — the exact
/// inverse of [`rt_string::escape_for_list`] (§4.4, §6).
pub(crate) fn parse(input: &str) -> Result<Value, FormatError> {
    let tokens = tokenize(input)?;
    let mut elements = Vec::with_capacity(tokens.len());
    for token in tokens {
        let unescaped = rt_string::unescape_element(&token)?;
        elements.push(rt_string::of_str(&unescaped));
    }
    Ok(from_values(elements))
}

fn tokenize(input: &str) -> Result<Vec<String>, FormatError> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let start = i;
        if bytes[i] == b'"' {
            i += 1;
            while i < bytes.len() && bytes[i] != b'"' {
                i += 1;
            }
            if i >= bytes.len() {
                return Err(FormatError::InvalidList(input.to_string()));
            }
            i += 1;
            tokens.push(input[start..i].to_string());
            continue;
        }
        if is_verbatim_start(bytes, i) {
            i = consume_verbatim(bytes, i)?;
            tokens.push(input[start..i].to_string());
            continue;
        }
        // A bare word ends at whitespace or at a `\{` that opens a verbatim
        // span glued directly onto it (no separating whitespace needed —
        // `\{`/`\}` are delimiters in their own right, like `escape_for_list`
        // never needs to pad them with a space).
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !is_verbatim_start(bytes, i) {
            i += 1;
        }
        tokens.push(input[start..i].to_string());
        if is_verbatim_start(bytes, i) {
            let vstart = i;
            i = consume_verbatim(bytes, i)?;
            tokens.push(input[vstart..i].to_string());
        }
    }
    Ok(tokens)
}

fn is_verbatim_start(bytes: &[u8], i: usize) -> bool {
    i + 1 < bytes.len() && bytes[i] == b'\\' && bytes[i + 1] == b'{'
}

/// Consumes a `\{…\}` verbatim span starting at `i`, tracking nested
/// `\{`/`\}` depth, and returns the index just past the matching `\}`.
fn consume_verbatim(bytes: &[u8], mut i: usize) -> Result<usize, FormatError> {
    i += 2;
    let mut depth = 1;
    while i < bytes.len() && depth > 0 {
        if bytes[i] == b'\\' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
            depth += 1;
            i += 2;
        } else if bytes[i] == b'\\' && i + 1 < bytes.len() && bytes[i + 1] == b'}' {
            depth -= 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    if depth != 0 {
        return Err(FormatError::UnbalancedBraces);
    }
    Ok(i)
}
