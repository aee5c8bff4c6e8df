//! Environment signals used to identify the terminal

use std::collections::BTreeMap;

/// Variables read by [`Environment::capture`]
pub const TRACKED_VARIABLES: &[&str] = &[
    "TERM",
    "TERM_PROGRAM",
    "TERM_PROGRAM_VERSION",
    "TERMINAL_EMULATOR",
    "PTYXIS_VERSION",
    "VTE_VERSION",
    "LANG",
];

/// Pseudo-variable holding the platform identifier
pub const PLATFORM_KEY: &str = "PLATFORM";

/// Owned snapshot of the environment signals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the tracked variables from the current process
    pub fn capture() -> Self {
        let mut env: Environment = TRACKED_VARIABLES
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (*key, value)))
            .collect();
        env.set(PLATFORM_KEY, std::env::consts::OS);
        env
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
