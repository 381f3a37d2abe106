//! Oxi85: Ascii85 (btoa) binary-to-text encoding in Rust.
//!
//! The crate provides:
//! - A streaming Ascii85 codec (`codec`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use oxi85::codec::{decoder, encoder};
//!
//! let encoded = encoder::encode_all(b"Man ");
//! assert_eq!(encoded, b"<~9jqo^~>");
//! let decoded = decoder::decode_all(&encoded).unwrap();
//! assert_eq!(decoded, b"Man ");
//! ```

pub mod codec;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;
