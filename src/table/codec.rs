//! Compact width-table codec
//!
//! A compact table is a run of fixed 5-byte records: one width digit followed
//! by the record's first codepoint as 4 base-36 characters. Each record's
//! width holds until the next record's codepoint.
//!
//! Terminal tables are stored as patches over a base table. A patch uses
//! `Inherit` wherever it agrees with the table below it, and [`merge`]
//! flattens a stack of them into one table.

use crate::width::Width;

/// Length of one record in the compact format
pub const RECORD_LEN: usize = 5;

/// Largest codepoint a record can address (`zzzz` in base 36)
pub const MAX_ENCODABLE: u32 = 36 * 36 * 36 * 36 - 1;

/// A point where the width changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    /// First codepoint covered by this breakpoint
    pub start: u32,
    /// Width from `start` up to the next breakpoint
    pub width: Width,
}

impl Breakpoint {
    pub fn new(start: u32, width: Width) -> Self {
        Self { start, width }
    }
}

/// Error decoding a compact table
///
/// Tables are static data, so any of these means the bundled data is corrupt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("width table is empty")]
    Empty,

    #[error("width table length {len} is not a multiple of {RECORD_LEN}")]
    BadLength { len: usize },

    #[error("non-numeric width digit {found:#04x} at offset {offset}")]
    NonNumericWidth { offset: usize, found: u8 },

    #[error("unknown width digit '{digit}' at offset {offset}")]
    UnknownWidth { offset: usize, digit: char },

    #[error("invalid base-36 codepoint at offset {offset}")]
    BadCodepoint { offset: usize },

    #[error("codepoint {codepoint:#x} at offset {offset} does not follow {previous:#x}")]
    NotIncreasing {
        offset: usize,
        previous: u32,
        codepoint: u32,
    },

    #[error("merged table has no width for codepoint {codepoint:#x}")]
    Unresolved { codepoint: u32 },
}

/// Decode a compact table
pub fn decode(text: &str) -> Result<Vec<Breakpoint>, DecodeError> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if bytes.len() % RECORD_LEN != 0 {
        return Err(DecodeError::BadLength { len: bytes.len() });
    }

    let mut breakpoints: Vec<Breakpoint> = Vec::with_capacity(bytes.len() / RECORD_LEN);
    for (index, record) in bytes.chunks_exact(RECORD_LEN).enumerate() {
        let offset = index * RECORD_LEN;
        let digit = record[0];
        if !digit.is_ascii_digit() {
            return Err(DecodeError::NonNumericWidth { offset, found: digit });
        }
        let width = Width::from_digit(digit).ok_or(DecodeError::UnknownWidth {
            offset,
            digit: char::from(digit),
        })?;
        let start = parse_base36(&record[1..]).ok_or(DecodeError::BadCodepoint { offset: offset + 1 })?;
        if let Some(previous) = breakpoints.last() {
            if start <= previous.start {
                return Err(DecodeError::NotIncreasing {
                    offset,
                    previous: previous.start,
                    codepoint: start,
                });
            }
        }
        breakpoints.push(Breakpoint::new(start, width));
    }

    tracing::trace!(records = breakpoints.len(), "decoded width table");
    Ok(breakpoints)
}

/// Encode breakpoints in the compact format
///
/// Starts beyond [`MAX_ENCODABLE`] cannot be represented and are skipped.
pub fn encode(breakpoints: &[Breakpoint]) -> String {
    let mut out = String::with_capacity(breakpoints.len() * RECORD_LEN);
    for breakpoint in breakpoints {
        if breakpoint.start > MAX_ENCODABLE {
            continue;
        }
        out.push(breakpoint.width.digit());
        push_base36(&mut out, breakpoint.start);
    }
    out
}

/// Flatten a stack of tables, highest priority first
///
/// At every codepoint the first table whose width is not `Inherit` wins; the
/// last table is used unconditionally. Each table is walked with its own
/// cursor, so the cost is linear in the total number of breakpoints.
///
/// An empty stack yields a single `Inherit` breakpoint.
pub fn merge<T: AsRef<[Breakpoint]>>(tables: &[T]) -> Vec<Breakpoint> {
    let Some(last) = tables.len().checked_sub(1) else {
        return vec![Breakpoint::new(0, Width::Inherit)];
    };

    let mut cursors = vec![0usize; tables.len()];
    let mut merged: Vec<Breakpoint> = Vec::new();
    let mut position = Some(0u32);

    while let Some(at) = position {
        let mut next: Option<u32> = None;
        for (layer, table) in tables.iter().enumerate() {
            let table = table.as_ref();
            let cursor = &mut cursors[layer];
            while table.get(*cursor + 1).is_some_and(|following| at >= following.start) {
                *cursor += 1;
            }
            if let Some(following) = table.get(*cursor + 1) {
                next = Some(next.map_or(following.start, |n| n.min(following.start)));
            }
            let Some(current) = table.get(*cursor) else {
                continue;
            };
            if current.width != Width::Inherit || layer == last {
                if merged.last().map(|bp| bp.width) != Some(current.width) {
                    merged.push(Breakpoint::new(at, current.width));
                }
                break;
            }
        }
        position = next;
    }

    merged
}

/// Parse base-36 digits (either case)
pub(crate) fn parse_base36(digits: &[u8]) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u32, |acc, &byte| {
        let digit = char::from(byte).to_digit(36)?;
        acc.checked_mul(36)?.checked_add(digit)
    })
}

/// Append `value` as 4 lowercase base-36 digits
pub(crate) fn push_base36(out: &mut String, value: u32) {
    let mut digits = ['0'; 4];
    let mut rest = value;
    for slot in digits.iter_mut().rev() {
        *slot = char::from_digit(rest % 36, 36).unwrap_or('0');
        rest /= 36;
    }
    out.extend(digits);
}
