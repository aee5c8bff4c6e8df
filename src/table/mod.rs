//! Width tables
//!
//! Decoding, merging and lookup of per-terminal width tables. Codepoints at or
//! above [`CODEPOINT_COUNT`] are synthetic ids addressing compiled
//! multi-codepoint sequences.

pub mod codec;
mod lookup;

pub use codec::{decode, encode, merge, Breakpoint, DecodeError};
pub use lookup::WidthTable;

/// Number of Unicode codepoints; the first synthetic sequence id
pub const CODEPOINT_COUNT: u32 = 0x110000;
