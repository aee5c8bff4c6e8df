//! Multi-codepoint cluster recognition
//!
//! `pattern` compiles the bundled sequence definitions into synthetic id
//! ranges addressable through an ordinary [`WidthTable`](crate::table::WidthTable);
//! `matcher` recognizes those sequences in a codepoint stream.

mod matcher;
mod pattern;

pub use matcher::{ClusterState, Matcher};
pub use pattern::{Part, Pattern, PatternError, PatternSet};
