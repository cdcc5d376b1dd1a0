//! Multi-base rendering of byte buffers
//!
//! A buffer is read as a big-endian unsigned integer and written out in each
//! of a fixed set of bases, largest first.

use num_bigint::BigUint;
use num_traits::{Num, Zero};
use serde::Serialize;

use crate::error::{SoliError, SoliResult};

/// Bases rendered for key material, in output order
pub const BASES: [u32; 11] = [32, 16, 10, 9, 8, 7, 6, 5, 4, 3, 2];

/// One textual form of the integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseForm {
    pub base: u32,
    pub digits: String,
}

/// A byte buffer and its renderings in every base of [`BASES`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedForms {
    pub bytes: Vec<u8>,
    pub forms: Vec<BaseForm>,
}

impl RenderedForms {
    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }

    /// Digits for `base`, if it was rendered
    pub fn digits(&self, base: u32) -> Option<&str> {
        self.forms
            .iter()
            .find(|form| form.base == base)
            .map(|form| form.digits.as_str())
    }
}

/// Render `bytes` in every base of [`BASES`]
///
/// Digits above 9 are lowercase letters and there is no zero padding. An
/// empty buffer has no renderings.
pub fn render(bytes: &[u8]) -> RenderedForms {
    let forms = if bytes.is_empty() {
        Vec::new()
    } else {
        let value = BigUint::from_bytes_be(bytes);
        BASES
            .iter()
            .map(|&base| BaseForm {
                base,
                digits: value.to_str_radix(base),
            })
            .collect()
    };

    RenderedForms {
        bytes: bytes.to_vec(),
        forms,
    }
}

/// Parse an integer literal into its big-endian magnitude bytes
///
/// The base comes from the prefix: `0x` (16), `0o` (8), `0b` (2), a bare
/// leading `0` (8), otherwise decimal. A sign is accepted and dropped.
/// Single underscores may separate digits or follow a prefix. Zero parses to
/// an empty buffer.
pub fn parse_int_literal(literal: &str) -> SoliResult<Vec<u8>> {
    let invalid = || SoliError::Parse(format!("invalid integer literal `{}`", literal));

    let unsigned = literal
        .strip_prefix('+')
        .or_else(|| literal.strip_prefix('-'))
        .unwrap_or(literal);

    let (radix, digits, prefixed) = split_radix_prefix(unsigned);
    let digits = strip_separators(digits, prefixed).ok_or_else(invalid)?;

    let value = BigUint::from_str_radix(&digits, radix).map_err(|_| invalid())?;
    if value.is_zero() {
        return Ok(Vec::new());
    }
    Ok(value.to_bytes_be())
}

fn split_radix_prefix(s: &str) -> (u32, &str, bool) {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return (10, s, false);
    }
    match bytes[1] {
        b'x' | b'X' => (16, &s[2..], true),
        b'o' | b'O' => (8, &s[2..], true),
        b'b' | b'B' => (2, &s[2..], true),
        _ => (8, &s[1..], true),
    }
}

/// Validate underscore placement and return the bare digits
fn strip_separators(digits: &str, prefixed: bool) -> Option<String> {
    if digits.is_empty() || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    if digits.starts_with('_') && !prefixed {
        return None;
    }

    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(cleaned)
}
