//! TTY Typesetter Library
//!
//! Measures how many cells text occupies on a specific terminal emulator and
//! wraps it into lines that fit. Different terminals disagree about the width
//! of emoji, combining sequences and ambiguous characters, so widths come from
//! per-terminal tables rather than from Unicode data alone.
//!
//! - `table`: compact width table codec and lookup
//! - `profile`: terminal detection and bundled width data
//! - `cluster`: grapheme-cluster patterns and the incremental matcher
//! - `ansi`: escape sequence filter
//! - `typesetter`: measurement and line wrapping
//! - `app`: persistent configuration
//!
//! ```no_run
//! use tty_typesetter::{Catalog, Environment, Typesetter, TypesetOptions};
//!
//! let catalog = Catalog::builtin();
//! let ts = Typesetter::new(&catalog, &Environment::capture())?;
//! for line in ts.typeset("some long text", &TypesetOptions::for_terminal()) {
//!     print!("{line}");
//! }
//! # Ok::<(), tty_typesetter::Error>(())
//! ```

pub mod ansi;
pub mod app;
pub mod catalog;
pub mod cluster;
pub mod error;
pub mod profile;
pub mod table;
pub mod terminal_size;
pub mod typesetter;
pub mod width;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use profile::{ClusterSupport, Environment, Profile, Registry};
pub use typesetter::{
    AtomicClusters, Lines, Metadata, Progressive, State, StateOptions, TypesetOptions, Typesetter,
};
pub use width::{Advance, Width};
