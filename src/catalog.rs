//! Shared, immutable context for building typesetters

use std::borrow::Cow;
use std::sync::OnceLock;

use crate::cluster::{PatternError, PatternSet};
use crate::profile::{data, Registry};

/// Terminal profiles plus the sequence patterns their tables address
///
/// Build one per process and pass it by reference. Tables and patterns are
/// decoded on first use and never change afterwards.
#[derive(Debug)]
pub struct Catalog {
    registry: Registry,
    pattern_text: Cow<'static, str>,
    patterns: OnceLock<Result<PatternSet, PatternError>>,
}

impl Catalog {
    pub fn new(registry: Registry, pattern_text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            registry,
            pattern_text: pattern_text.into(),
            patterns: OnceLock::new(),
        }
    }

    /// The bundled profiles and patterns
    pub fn builtin() -> Self {
        Self::new(Registry::builtin(), data::payload(data::SEQUENCES))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The compiled sequence patterns, compiled on first call
    pub fn patterns(&self) -> Result<&PatternSet, PatternError> {
        self.patterns
            .get_or_init(|| PatternSet::compile(&self.pattern_text))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
