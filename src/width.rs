//! Cell widths
//!
//! A width table maps every codepoint (and every compiled multi-codepoint
//! sequence) to one of the values below. The compact wire format stores each
//! value as a single decimal digit:
//!
//! | digit | value          |
//! |-------|----------------|
//! | `0`   | `Inherit`      |
//! | `1`   | `Unmeasurable` |
//! | `2`   | `Zero`         |
//! | `3`   | `Narrow`       |
//! | `4`   | `Wide`         |
//! | `9`   | `Unsupported`  |

/// Width of a codepoint or sequence in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    /// No override here, consult the next table in the stack.
    /// Only found in decoded patch tables, never in a merged table.
    Inherit,
    /// No rendering data. For a sequence this means the terminal does not
    /// render it as a joined unit, so its parts are measured separately.
    Unsupported,
    /// Control characters, which move the cursor in their own way
    Unmeasurable,
    /// Combining marks, joiners and other invisible codepoints
    Zero,
    /// One cell
    Narrow,
    /// Two cells
    Wide,
}

impl Width {
    /// Decode a wire-format digit
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            b'0' => Some(Width::Inherit),
            b'1' => Some(Width::Unmeasurable),
            b'2' => Some(Width::Zero),
            b'3' => Some(Width::Narrow),
            b'4' => Some(Width::Wide),
            b'9' => Some(Width::Unsupported),
            _ => None,
        }
    }

    /// Encode as a wire-format digit
    pub fn digit(self) -> char {
        match self {
            Width::Inherit => '0',
            Width::Unmeasurable => '1',
            Width::Zero => '2',
            Width::Narrow => '3',
            Width::Wide => '4',
            Width::Unsupported => '9',
        }
    }

    /// Number of cells, for widths that advance the cursor predictably
    pub fn cells(self) -> Option<u8> {
        match self {
            Width::Zero => Some(0),
            Width::Narrow => Some(1),
            Width::Wide => Some(2),
            Width::Inherit | Width::Unsupported | Width::Unmeasurable => None,
        }
    }
}

/// Result of measuring one codepoint in the context of the codepoints before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Cells to advance. Negative when a cluster turned out narrower than the
    /// cells already reported for its earlier codepoints.
    Cells(i32),
    /// A control character or a codepoint with no rendering data
    Control,
}

impl Advance {
    /// Cells to add to a running total (controls count as zero)
    pub fn delta(self) -> i32 {
        match self {
            Advance::Cells(cells) => cells,
            Advance::Control => 0,
        }
    }
}
