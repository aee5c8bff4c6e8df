//! Measurement and typesetting options

use serde::{Deserialize, Serialize};

use crate::terminal_size;

/// Options for stateful measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateOptions {
    /// Give escape sequences zero width
    pub skip_ansi: bool,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self { skip_ansi: true }
    }
}

/// When to keep grapheme clusters together on one line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtomicClusters {
    /// Never break inside a possible cluster
    #[default]
    Always,
    /// Clusters may be split like any other text
    Never,
    /// Keep clusters together only on terminals that render them joined
    IfSupported,
}

/// Options for line wrapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypesetOptions {
    /// Wrap lines longer than this; `None` never wraps. Values below 1 are
    /// treated as 1.
    pub column_limit: Option<usize>,
    /// Add a space after glyphs the terminal advances by one cell but which
    /// are normally two cells wide
    pub pad_unsupported_characters: bool,
    /// Treat U+00AD as an invisible break opportunity, shown as `-` when used
    pub soft_hyphens: bool,
    /// Prefer breaking at spaces and soft hyphens over splitting words
    pub nice_wrap: bool,
    pub atomic_grapheme_clusters: AtomicClusters,
    /// Expand tabs to this stop interval; `None` passes tabs through
    pub tab_size: Option<usize>,
    /// Column the first line starts at
    pub begin_column: usize,
    /// Column continuation lines start at; defaults to `begin_column` and is
    /// kept below the column limit
    pub wrap_column: Option<usize>,
    pub skip_ansi: bool,
}

impl Default for TypesetOptions {
    fn default() -> Self {
        Self {
            column_limit: None,
            pad_unsupported_characters: true,
            soft_hyphens: true,
            nice_wrap: true,
            atomic_grapheme_clusters: AtomicClusters::Always,
            tab_size: Some(8),
            begin_column: 0,
            wrap_column: None,
            skip_ansi: true,
        }
    }
}

impl TypesetOptions {
    /// Defaults with the column limit taken from the attached terminal
    pub fn for_terminal() -> Self {
        Self {
            column_limit: terminal_size::ambient_columns(),
            ..Self::default()
        }
    }

    /// Set the column limit
    pub fn with_column_limit(mut self, limit: usize) -> Self {
        self.column_limit = Some(limit);
        self
    }

    pub fn state_options(&self) -> StateOptions {
        StateOptions {
            skip_ansi: self.skip_ansi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TypesetOptions::default();
        assert_eq!(options.column_limit, None);
        assert!(options.pad_unsupported_characters);
        assert!(options.soft_hyphens);
        assert!(options.nice_wrap);
        assert_eq!(options.atomic_grapheme_clusters, AtomicClusters::Always);
        assert_eq!(options.tab_size, Some(8));
        assert_eq!(options.begin_column, 0);
        assert_eq!(options.wrap_column, None);
        assert!(options.state_options().skip_ansi);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: TypesetOptions =
            serde_json::from_str(r#"{"column_limit": 40, "atomic_grapheme_clusters": "if-supported"}"#)
                .unwrap();
        assert_eq!(options.column_limit, Some(40));
        assert_eq!(options.atomic_grapheme_clusters, AtomicClusters::IfSupported);
        assert!(options.nice_wrap);
        assert_eq!(options.tab_size, Some(8));
    }

    #[test]
    fn test_serialization() {
        let options = TypesetOptions::default().with_column_limit(20);
        let json = serde_json::to_string(&options).unwrap();
        let restored: TypesetOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(options, restored);
    }
}
