// Group arithmetic shared by the encoder and decoder.
//
// A group is up to four bytes packed big-endian into a `u32`. A word expands
// to five base-85 digits, most-significant first. Partial groups are computed
// as if padded (zeros on encode, `u` on decode) and then truncated; the length
// laws for that truncation live here so they can be tested without any I/O.

use super::{BASE, DIGIT_OFFSET, GROUP_BYTES, GROUP_DIGITS, MAX_DIGIT};

/// Pack up to four bytes into a big-endian word, zero-filling missing positions.
#[inline]
pub fn pack_word(bytes: &[u8]) -> u32 {
    debug_assert!(bytes.len() <= GROUP_BYTES);
    let mut buf = [0u8; GROUP_BYTES];
    buf[..bytes.len()].copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}

/// Expand a word into five printable digit characters, most-significant first.
#[inline]
pub fn word_to_chars(word: u32) -> [u8; GROUP_DIGITS] {
    let mut out = [0u8; GROUP_DIGITS];
    let mut rest = word;
    for slot in out.iter_mut().rev() {
        *slot = (rest % BASE) as u8 + DIGIT_OFFSET;
        rest /= BASE;
    }
    out
}

/// Fold five digit values (0..=84) into a word.
///
/// Uses 32-bit wrapping arithmetic: digit groups above `u32::MAX`
/// (for example `uuuuu`) wrap instead of panicking.
#[inline]
pub fn fold_digits(digits: &[u8; GROUP_DIGITS]) -> u32 {
    digits
        .iter()
        .fold(0u32, |acc, &d| acc.wrapping_mul(BASE).wrapping_add(d as u32))
}

/// Map a printable character to its digit value, or `None` outside `!`..=`u`.
#[inline]
pub fn char_to_digit(byte: u8) -> Option<u8> {
    match byte {
        b @ b'!'..=b'u' => Some(b - DIGIT_OFFSET),
        _ => None,
    }
}

/// Number of characters emitted for a group of `n` raw bytes (1..=4).
///
/// A full group yields 5, a partial group of `n` bytes yields `n + 1`.
/// The zero shorthand is a separate decision made by the encoder.
#[inline]
pub const fn encoded_len(n: usize) -> usize {
    if n == 0 { 0 } else { n + 1 }
}

/// Number of bytes produced by a group of `k` digits (1..=5).
///
/// A full group yields 4, a trailing partial group of `k` digits yields
/// `k - 1` (so a lone digit yields nothing).
#[inline]
pub const fn decoded_len(k: usize) -> usize {
    if k == 0 { 0 } else { k - 1 }
}

/// Decode a trailing partial digit group of `k` digits (1..=4).
///
/// Pads with `MAX_DIGIT`, folds, and returns the word's bytes together with
/// the number of them that are real output.
pub fn decode_partial(digits: &[u8]) -> ([u8; GROUP_BYTES], usize) {
    debug_assert!(!digits.is_empty() && digits.len() < GROUP_DIGITS);
    let mut padded = [MAX_DIGIT; GROUP_DIGITS];
    padded[..digits.len()].copy_from_slice(digits);
    (fold_digits(&padded).to_be_bytes(), decoded_len(digits.len()))
}
