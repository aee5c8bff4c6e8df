//! Bundled tables and sequence patterns
//!
//! Each file holds `key=value` metadata lines for the curation tooling and a
//! single payload line.

pub const UNICODE: &str = include_str!("../../data/unicode.txt");
pub const NO_SEQUENCES: &str = include_str!("../../data/no-sequences.txt");
pub const SEQUENCES: &str = include_str!("../../data/sequences.txt");

pub const JEDITERM: &str = include_str!("../../data/jediterm.txt");
pub const APPLE_TERMINAL: &str = include_str!("../../data/apple-terminal.txt");
pub const VSCODE: &str = include_str!("../../data/vscode.txt");
pub const WARP: &str = include_str!("../../data/warp.txt");
pub const RXVT_UNICODE: &str = include_str!("../../data/rxvt-unicode.txt");
pub const ETERM: &str = include_str!("../../data/eterm.txt");
pub const PTYXIS: &str = include_str!("../../data/ptyxis.txt");
pub const LINUX: &str = include_str!("../../data/linux.txt");
pub const VTE_8000: &str = include_str!("../../data/vte-8000.txt");
pub const VTE_7000: &str = include_str!("../../data/vte-7000.txt");
pub const VTE_LEGACY: &str = include_str!("../../data/vte-legacy.txt");
pub const XTERM: &str = include_str!("../../data/xterm.txt");

/// Strip metadata lines, leaving the payload
pub fn payload(file: &str) -> &str {
    file.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.contains('='))
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_skips_metadata() {
        assert_eq!(payload("name=x\nkind=fixture-patch\n30000\n"), "30000");
        assert_eq!(payload("name=x\n"), "");
    }

    #[test]
    fn test_bundled_tables_decode() {
        for file in [
            UNICODE,
            NO_SEQUENCES,
            JEDITERM,
            APPLE_TERMINAL,
            VSCODE,
            WARP,
            RXVT_UNICODE,
            ETERM,
            PTYXIS,
            LINUX,
            VTE_8000,
            VTE_7000,
            VTE_LEGACY,
            XTERM,
        ] {
            assert!(crate::table::decode(payload(file)).is_ok(), "{file:.40}");
            assert!(
                file.lines().any(|line| line.starts_with("kind=fixture-")),
                "{file:.40}"
            );
            assert!(!file.contains("captured="), "{file:.40}");
        }
    }
}
