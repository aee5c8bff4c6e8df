//! Ordered profile list and terminal detection

use super::data::{self, payload};
use super::{Environment, Profile, Requirement};

/// Profiles in priority order, ending with a fallback that always matches
#[derive(Debug)]
pub struct Registry {
    profiles: Vec<Profile>,
    fallback: Profile,
}

impl Registry {
    /// Build a registry; `fallback` is used when nothing else matches and
    /// serves as the reference profile
    pub fn new(profiles: Vec<Profile>, fallback: Profile) -> Self {
        Self { profiles, fallback }
    }

    /// The bundled terminal profiles
    pub fn builtin() -> Self {
        let unicode = payload(data::UNICODE);
        let no_sequences = payload(data::NO_SEQUENCES);
        let patched = |file: &'static str| [payload(file), no_sequences, unicode];

        let vte = |name: &'static str, file: &'static str, version: Requirement| {
            Profile::new(name, patched(file))
                .require("TERM", Requirement::Equals("xterm-256color"))
                .require("VTE_VERSION", version)
        };

        let profiles = vec![
            Profile::new("jediterm", patched(data::JEDITERM))
                .require("TERMINAL_EMULATOR", Requirement::Equals("JetBrains-JediTerm")),
            Profile::new("apple-terminal", patched(data::APPLE_TERMINAL))
                .require("TERM_PROGRAM", Requirement::Equals("Apple_Terminal"))
                .with_font_sequences(),
            Profile::new("vscode", patched(data::VSCODE))
                .require("TERM_PROGRAM", Requirement::Equals("vscode")),
            Profile::new("warp", patched(data::WARP))
                .require("TERM_PROGRAM", Requirement::Equals("WarpTerminal")),
            Profile::new("kitty", [unicode]).require("TERM", Requirement::Equals("xterm-kitty")),
            Profile::new("rxvt-unicode", patched(data::RXVT_UNICODE))
                .require("TERM", Requirement::Equals("rxvt-unicode")),
            Profile::new("eterm", patched(data::ETERM))
                .require("TERM", Requirement::Equals("eterm-color")),
            Profile::new("ptyxis", patched(data::PTYXIS))
                .require("PTYXIS_VERSION", Requirement::Defined),
            Profile::new("linux", patched(data::LINUX))
                .require("TERM", Requirement::Equals("linux")),
            vte("vte-8000", data::VTE_8000, Requirement::AtLeast(8000)),
            vte("vte-7000", data::VTE_7000, Requirement::AtLeast(7000)),
            vte("vte", data::VTE_LEGACY, Requirement::Defined),
            Profile::new("xterm-256color", patched(data::XTERM))
                .require("TERM", Requirement::Equals("xterm-256color")),
            Profile::new("xterm", patched(data::XTERM)).require("TERM", Requirement::Equals("xterm")),
        ];

        Self::new(profiles, Profile::new("unicode", [unicode]))
    }

    /// First profile whose requirements all hold
    pub fn select(&self, env: &Environment) -> &Profile {
        let profile = self
            .profiles
            .iter()
            .find(|p| p.matches(env))
            .unwrap_or(&self.fallback);
        tracing::debug!(profile = profile.name(), "selected terminal profile");
        profile
    }

    pub fn by_name(&self, name: &str) -> Option<&Profile> {
        self.iter().find(|p| p.name() == name)
    }

    /// Profile following the Unicode width rules, with no terminal quirks
    pub fn reference(&self) -> &Profile {
        &self.fallback
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter().chain(std::iter::once(&self.fallback))
    }
}
