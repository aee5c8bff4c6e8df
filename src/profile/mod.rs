//! Terminal profiles
//!
//! A profile pairs environment requirements that identify a terminal with the
//! stack of width tables describing how that terminal renders. The stack is
//! decoded and merged on first use and cached for the life of the profile.

pub mod data;
mod environment;
mod registry;

use std::borrow::Cow;
use std::sync::OnceLock;

pub use environment::{Environment, PLATFORM_KEY, TRACKED_VARIABLES};
pub use registry::Registry;

use crate::table::{DecodeError, WidthTable};

/// Predicate on a single environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Value is exactly this string
    Equals(&'static str),
    /// Variable is set and not empty
    Defined,
    /// Value parses as an integer no smaller than this
    AtLeast(u32),
}

impl Requirement {
    pub fn holds(self, value: Option<&str>) -> bool {
        match self {
            Requirement::Equals(expected) => value == Some(expected),
            Requirement::Defined => value.is_some_and(|v| !v.is_empty()),
            Requirement::AtLeast(min) => value
                .and_then(|v| v.trim().parse::<u32>().ok())
                .is_some_and(|v| v >= min),
        }
    }
}

/// How a terminal handles multi-codepoint clusters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterSupport {
    /// Clusters render joined and advance the cursor as one unit
    Full,
    /// Clusters render joined through font ligatures, but the cursor still
    /// advances for every codepoint
    FontOnly,
    /// Clusters render as their separate parts
    None,
}

/// A terminal's identification rules and width tables
#[derive(Debug)]
pub struct Profile {
    name: Cow<'static, str>,
    requirements: Vec<(Cow<'static, str>, Requirement)>,
    stack: Vec<Cow<'static, str>>,
    font_sequences: bool,
    table: OnceLock<Result<WidthTable, DecodeError>>,
}

impl Profile {
    /// Create a profile from compact tables, highest priority first
    pub fn new<I, T>(name: impl Into<Cow<'static, str>>, stack: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cow<'static, str>>,
    {
        Self {
            name: name.into(),
            requirements: Vec::new(),
            stack: stack.into_iter().map(Into::into).collect(),
            font_sequences: false,
            table: OnceLock::new(),
        }
    }

    /// Add a requirement on an environment variable
    pub fn require(mut self, key: impl Into<Cow<'static, str>>, requirement: Requirement) -> Self {
        self.requirements.push((key.into(), requirement));
        self
    }

    /// Mark the terminal as joining clusters through its font only
    pub fn with_font_sequences(mut self) -> Self {
        self.font_sequences = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn font_sequences(&self) -> bool {
        self.font_sequences
    }

    pub fn requirements(&self) -> impl Iterator<Item = (&str, Requirement)> {
        self.requirements.iter().map(|(k, r)| (&**k, *r))
    }

    /// Whether every requirement holds in `env`
    pub fn matches(&self, env: &Environment) -> bool {
        self.requirements
            .iter()
            .all(|(key, requirement)| requirement.holds(env.get(key)))
    }

    /// The merged width table, built on first call
    pub fn table(&self) -> Result<&WidthTable, DecodeError> {
        self.table
            .get_or_init(|| {
                let stack: Vec<&str> = self.stack.iter().map(|t| &**t).collect();
                let built = WidthTable::from_stack(&stack);
                match &built {
                    Ok(table) => tracing::debug!(
                        profile = %self.name,
                        layers = stack.len(),
                        breakpoints = table.len(),
                        "built width table"
                    ),
                    Err(e) => tracing::error!(profile = %self.name, error = %e, "corrupt width table"),
                }
                built
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn cluster_support(&self) -> Result<ClusterSupport, DecodeError> {
        let support = if self.table()?.has_sequence_data() {
            ClusterSupport::Full
        } else if self.font_sequences {
            ClusterSupport::FontOnly
        } else {
            ClusterSupport::None
        };
        Ok(support)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::Width;

    #[test]
    fn test_requirement_equals() {
        let r = Requirement::Equals("vscode");
        assert!(r.holds(Some("vscode")));
        assert!(!r.holds(Some("vscode2")));
        assert!(!r.holds(None));
    }

    #[test]
    fn test_requirement_defined() {
        assert!(Requirement::Defined.holds(Some("47.1")));
        assert!(!Requirement::Defined.holds(Some("")));
        assert!(!Requirement::Defined.holds(None));
    }

    #[test]
    fn test_requirement_at_least() {
        let r = Requirement::AtLeast(7000);
        assert!(r.holds(Some("7000")));
        assert!(r.holds(Some("8002")));
        assert!(!r.holds(Some("6800")));
        assert!(!r.holds(Some("seven")));
        assert!(!r.holds(None));
    }

    #[test]
    fn test_profile_matches_all_requirements() {
        let profile = Profile::new("vte", ["30000"])
            .require("TERM", Requirement::Equals("xterm-256color"))
            .require("VTE_VERSION", Requirement::Defined);

        let env: Environment = [("TERM", "xterm-256color"), ("VTE_VERSION", "6003")]
            .into_iter()
            .collect();
        assert!(profile.matches(&env));

        let env: Environment = [("TERM", "xterm-256color")].into_iter().collect();
        assert!(!profile.matches(&env));
    }

    #[test]
    fn test_table_is_memoized() {
        let profile = Profile::new("test", ["00000400a0", "30000"]);
        let first = profile.table().unwrap() as *const WidthTable;
        let second = profile.table().unwrap() as *const WidthTable;
        assert_eq!(first, second);
        assert_eq!(profile.table().unwrap().lookup(360), Width::Wide);
    }

    #[test]
    fn test_corrupt_table_reports_every_time() {
        let profile = Profile::new("broken", ["3000"]);
        assert_eq!(profile.table(), Err(DecodeError::BadLength { len: 4 }));
        assert!(profile.table().is_err());
        assert!(profile.cluster_support().is_err());
    }

    #[test]
    fn test_cluster_support() {
        let full = Profile::new("full", ["300004nvnk"]);
        assert_eq!(full.cluster_support(), Ok(ClusterSupport::Full));

        let font = Profile::new("font", ["300009nvnk"]).with_font_sequences();
        assert_eq!(font.cluster_support(), Ok(ClusterSupport::FontOnly));

        let none = Profile::new("none", ["300009nvnk"]);
        assert_eq!(none.cluster_support(), Ok(ClusterSupport::None));
    }
}
