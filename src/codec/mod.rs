// Ascii85 (btoa) codec.
//
// Four raw bytes map to five printable digits in `!`..=`u`, with `z` standing
// in for a full all-zero group. Encoded payloads are framed by `<~` and `~>`.
//
// # Modules
//
// - `group`     : Pure word packing, digit extraction, partial-group length laws
// - `lookahead` : One-byte lookahead cursor for delimiter matching
// - `encoder`   : Streaming encoder with 75-column line wrapping
// - `decoder`   : Header-seeking streaming decoder

pub mod decoder;
pub mod encoder;
pub mod group;
pub mod lookahead;

// Re-export key types for convenience.
pub use decoder::{Ascii85Decoder, DecodeError, DecodeState, DecodeStats, StreamEnd};
pub use encoder::{Ascii85Encoder, EncodeError, EncodeStats};
pub use lookahead::Lookahead;

// ---------------------------------------------------------------------------
// Wire constants
// ---------------------------------------------------------------------------

/// Payload header.
pub const HEADER: &[u8; 2] = b"<~";

/// Payload trailer.
pub const TRAILER: &[u8; 2] = b"~>";

/// Shorthand for a full group of four zero bytes.
pub const ZERO_SHORTHAND: u8 = b'z';

/// Added to a digit value to produce its character (`!`).
pub const DIGIT_OFFSET: u8 = 33;

/// Largest digit value (84, the character `u`). Used to pad partial digit groups.
pub const MAX_DIGIT: u8 = 84;

/// Number base of the encoding.
pub const BASE: u32 = 85;

/// Raw bytes per group.
pub const GROUP_BYTES: usize = 4;

/// Digits per full group.
pub const GROUP_DIGITS: usize = 5;

/// A new line is started once a line holds this many characters.
pub const LINE_WIDTH: usize = 75;

/// Returns true for the whitespace bytes skipped inside a payload.
#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}
