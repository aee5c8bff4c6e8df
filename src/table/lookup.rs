//! Flattened width table with binary-search lookup

use super::codec::{self, Breakpoint, DecodeError};
use super::CODEPOINT_COUNT;
use crate::width::Width;

/// A merged breakpoint table
///
/// Breakpoints are strictly increasing and never `Inherit`. Each breakpoint
/// covers the codepoints up to the next one; the last extends to infinity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthTable {
    breakpoints: Vec<Breakpoint>,
}

impl WidthTable {
    /// Wrap already merged breakpoints
    pub fn new(breakpoints: Vec<Breakpoint>) -> Result<Self, DecodeError> {
        if breakpoints.is_empty() {
            return Err(DecodeError::Empty);
        }
        if let Some(unresolved) = breakpoints.iter().find(|bp| bp.width == Width::Inherit) {
            return Err(DecodeError::Unresolved {
                codepoint: unresolved.start,
            });
        }
        debug_assert!(breakpoints.windows(2).all(|w| w[0].start < w[1].start));
        Ok(Self { breakpoints })
    }

    /// Decode and merge a stack of compact tables, highest priority first
    pub fn from_stack(tables: &[&str]) -> Result<Self, DecodeError> {
        let decoded = tables
            .iter()
            .map(|text| codec::decode(text))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(codec::merge(&decoded))
    }

    /// Width of a codepoint or synthetic sequence id
    pub fn lookup(&self, codepoint: u32) -> Width {
        let index = self.breakpoints.partition_point(|bp| bp.start <= codepoint);
        // Before the first breakpoint the first entry still applies
        self.breakpoints[index.saturating_sub(1)].width
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    /// Whether any compiled sequence has a combined width in this table
    pub fn has_sequence_data(&self) -> bool {
        self.breakpoints
            .iter()
            .any(|bp| bp.start >= CODEPOINT_COUNT && bp.width != Width::Unsupported)
    }
}
