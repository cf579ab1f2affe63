//! Bijective base62 encoding between record identifiers and short codes.
//!
//! The alphabet order is part of the deployed code table: changing it would
//! remap every code already handed out.

use crate::error::DecodeError;

/// Digits, then lowercase, then uppercase.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The radix of the encoding.
pub const BASE: u64 = ALPHABET.len() as u64;

/// Length of the code for `u64::MAX`, the longest code `encode` can produce.
pub const MAX_ENCODED_LEN: usize = 11;

const INVALID: u8 = u8::MAX;

const DECODE_TABLE: [u8; 128] = build_decode_table();

const fn build_decode_table() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Encodes an identifier, most significant digit first.
///
/// `encode(0)` is `"0"`; no other code starts with the zero digit.
///
/// # Examples
///
/// ```
/// use zipit_core::base62;
///
/// assert_eq!(base62::encode(0), "0");
/// assert_eq!(base62::encode(62), "10");
/// assert_eq!(base62::decode("10"), Ok(62));
/// ```
pub fn encode(mut id: u64) -> String {
    if id == 0 {
        return char::from(ALPHABET[0]).to_string();
    }

    let mut buf = [0u8; MAX_ENCODED_LEN];
    let mut start = MAX_ENCODED_LEN;
    while id > 0 {
        start -= 1;
        buf[start] = ALPHABET[(id % BASE) as usize];
        id /= BASE;
    }

    buf[start..].iter().copied().map(char::from).collect()
}

/// Decodes a code back into its identifier.
///
/// The empty string folds to `0`. Any character outside [`ALPHABET`] fails
/// with [`DecodeError::InvalidCharacter`], even when the digits before it
/// already overflow; values past `u64::MAX` fail with
/// [`DecodeError::Overflow`].
pub fn decode(code: &str) -> Result<u64, DecodeError> {
    if let Some((position, character)) = code.chars().enumerate().find(|&(_, c)| !is_digit(c)) {
        return Err(DecodeError::InvalidCharacter {
            character,
            position,
        });
    }

    code.chars()
        .filter_map(digit_value)
        .try_fold(0u64, |acc, digit| {
            acc.checked_mul(BASE)
                .and_then(|value| value.checked_add(digit))
                .ok_or(DecodeError::Overflow)
        })
}

/// Returns `true` if `c` belongs to the alphabet.
pub fn is_digit(c: char) -> bool {
    digit_value(c).is_some()
}

fn digit_value(c: char) -> Option<u64> {
    if !c.is_ascii() {
        return None;
    }
    match DECODE_TABLE[c as usize] {
        INVALID => None,
        value => Some(u64::from(value)),
    }
}
