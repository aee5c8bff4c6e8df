//! Measurement and line wrapping for one terminal
//!
//! A [`Typesetter`] binds the width table of the detected terminal profile,
//! the reference Unicode table and the compiled sequence patterns. It is a
//! cheap `Copy` handle; per-string state lives in [`State`] and [`Lines`].

mod options;
mod wrap;

pub use options::{AtomicClusters, StateOptions, TypesetOptions};
pub use wrap::{Lines, Metadata};

pub use crate::profile::ClusterSupport;

use crate::ansi::{AnsiFilter, Filtered};
use crate::catalog::Catalog;
use crate::cluster::{ClusterState, Matcher, PatternSet};
use crate::error::{Error, Result};
use crate::profile::{Environment, Profile};
use crate::table::{WidthTable, CODEPOINT_COUNT};
use crate::width::{Advance, Width};

/// Stateful measurement context for one stream of codepoints
#[derive(Debug, Clone)]
pub struct State {
    ansi: AnsiFilter,
    cluster: ClusterState,
}

impl State {
    pub fn new(options: &StateOptions) -> Self {
        Self {
            ansi: AnsiFilter::new(options.skip_ansi),
            cluster: ClusterState::new(),
        }
    }

    /// Length of the possibly unfinished cluster ending at the last codepoint
    pub fn uncertain_codepoints(&self) -> usize {
        self.cluster.uncertain()
    }

    /// Whether the last codepoint left an escape sequence open
    pub fn in_escape(&self) -> bool {
        self.ansi.in_escape()
    }
}

/// Width measurement and typesetting for one terminal profile
#[derive(Debug, Clone, Copy)]
pub struct Typesetter<'a> {
    profile: &'a Profile,
    table: &'a WidthTable,
    reference: &'a WidthTable,
    patterns: &'a PatternSet,
    support: ClusterSupport,
}

impl<'a> Typesetter<'a> {
    /// Typesetter for the terminal identified by `env`
    pub fn new(catalog: &'a Catalog, env: &Environment) -> Result<Self> {
        Self::for_profile(catalog, catalog.registry().select(env))
    }

    /// Typesetter for a profile chosen by name
    pub fn with_profile(catalog: &'a Catalog, name: &str) -> Result<Self> {
        let profile = catalog
            .registry()
            .by_name(name)
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))?;
        Self::for_profile(catalog, profile)
    }

    fn for_profile(catalog: &'a Catalog, profile: &'a Profile) -> Result<Self> {
        Ok(Self {
            profile,
            table: profile.table()?,
            reference: catalog.registry().reference().table()?,
            patterns: catalog.patterns()?,
            support: profile.cluster_support()?,
        })
    }

    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    pub fn profile_name(&self) -> &'a str {
        self.profile.name()
    }

    /// How the terminal renders multi-codepoint clusters
    pub fn supports_grapheme_clusters(&self) -> ClusterSupport {
        self.support
    }

    /// Width of a single codepoint, ignoring context
    pub fn measure_codepoint(&self, codepoint: u32) -> Width {
        if codepoint >= CODEPOINT_COUNT {
            return Width::Unsupported;
        }
        self.table.lookup(codepoint)
    }

    pub fn measure_char(&self, c: char) -> Width {
        self.measure_codepoint(c as u32)
    }

    /// Width of a codepoint on a terminal following the Unicode rules
    pub(crate) fn reference_width(&self, codepoint: u32) -> Width {
        self.reference.lookup(codepoint)
    }

    pub fn state(&self, options: &StateOptions) -> State {
        State::new(options)
    }

    /// Cells to advance for `codepoint` given the codepoints already fed to
    /// `state`
    ///
    /// Escape sequence bytes advance zero cells. A negative result corrects
    /// cells reported earlier for the same cluster.
    pub fn measure_stateful(&self, codepoint: u32, state: &mut State) -> Advance {
        if state.ansi.process(codepoint) == Filtered::Consumed {
            return Advance::Cells(0);
        }
        Matcher::new(self.patterns, self.table).advance(codepoint, &mut state.cluster)
    }

    /// Cells occupied by `text`; control characters count as zero
    pub fn measure_str(&self, text: &str, options: &StateOptions) -> usize {
        let mut state = self.state(options);
        let total: i64 = text
            .chars()
            .map(|c| i64::from(self.measure_stateful(c as u32, &mut state).delta()))
            .sum();
        usize::try_from(total).unwrap_or(0)
    }

    /// Running-total measurement, one character at a time
    pub fn progressive(&self, options: &StateOptions) -> Progressive<'a> {
        Progressive {
            typesetter: *self,
            state: self.state(options),
            total: 0,
        }
    }

    /// Wrap `text` into lines
    pub fn typeset<'t>(&self, text: &'t str, options: &TypesetOptions) -> Lines<'a, 't> {
        Lines::new(*self, text, options)
    }

    /// Typeset without wrapping, returning the whole result
    ///
    /// Tabs are still expanded, and padding and soft hyphen removal still
    /// apply.
    pub fn typeset_line(&self, text: &str, options: &TypesetOptions) -> String {
        let options = TypesetOptions {
            column_limit: None,
            nice_wrap: false,
            wrap_column: None,
            ..options.clone()
        };
        self.typeset(text, &options).collect()
    }
}

/// Accumulates the width of a string fed one character at a time
#[derive(Debug, Clone)]
pub struct Progressive<'a> {
    typesetter: Typesetter<'a>,
    state: State,
    total: i64,
}

impl Progressive<'_> {
    /// Add a character and return the width so far
    pub fn push(&mut self, c: char) -> usize {
        self.push_codepoint(c as u32)
    }

    pub fn push_codepoint(&mut self, codepoint: u32) -> usize {
        let advance = self.typesetter.measure_stateful(codepoint, &mut self.state);
        self.total += i64::from(advance.delta());
        self.total()
    }

    pub fn total(&self) -> usize {
        usize::try_from(self.total).unwrap_or(0)
    }
}
