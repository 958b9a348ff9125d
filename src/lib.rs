//! Create directory trees from a single line of text.
//!
//! ### Overview
//!
//! `dirfile-kit` reads a compact path-like string such as
//!
//! ```text
//! \proj\src > tests\test_main.rs :"fn main() {}" :> README.md
//! ```
//!
//! finds the longest prefix of it that names an existing directory (the *anchor*),
//! and replays the rest as a walk of a cursor that creates directories and files
//! below the anchor. Directories and files are both called *dirfiles*: a token whose
//! last dot-suffix is a known extension is a file, anything else is a directory.
//!
//! **Operators** (between two names):
//! - `\` or `/` (*Change*): descend into the directory just named.
//! - `>` (*Next*): create a sibling at the current level.
//! - `:>` (*Prev*): go up one level, then create.
//! - `:"..."` (*text block*): initial contents of the file just named.
//!
//! **Key ideas**:
//! - **Validation first**: grammar, names and operator placement are checked before
//!   anything touches the disk.
//! - **Pluggable storage**: the walk runs over the [`FsBackend`] trait; [`DirFS`] maps
//!   onto a host directory, [`MapFS`] keeps everything in memory.
//! - **Reversible**: a failed run can remove what it created ([`Options::set_rollback_on_failure`]),
//!   and [`Action::Delete`] removes a described tree again.
//!
//! ### Example
//!
//! ```
//! use dirfile_kit::{Options, SlashMode};
//!
//! let base = std::env::temp_dir().join("dirfile_kit_lib_doc");
//! std::fs::create_dir_all(&base).unwrap();
//!
//! let mut options = Options::new();
//! options.set_slash_mode(SlashMode::Forward);
//! options.set_base_dir(&base);
//!
//! dirfile_kit::run("/app > src/main.rs :\"fn main() {}\"", &options).unwrap();
//! assert!(base.join("app").is_dir());
//! assert!(base.join("src/main.rs").is_file());
//! # std::fs::remove_dir_all(&base).unwrap();
//! ```

mod core;
mod driver;
mod error;
mod extractor;
pub mod lang;
mod options;
mod vfs;

pub use crate::core::{FsBackend, HostProbe, Probe, Result};
pub use driver::{Driver, Outcome, Report, Step, StepKind, plan};
pub use error::{Error, ErrorKind, NameError};
pub use extractor::{Extraction, Extractor};
pub use lang::{Argument, ArgumentKind, Operation, SlashMode};
pub use options::{Action, Options};
pub use vfs::{DirFS, Entry, EntryType, MapFS};

use tracing::info;

/// Parses `input`, then creates or deletes the dirfiles it describes on the host.
///
/// The anchor is searched with [`HostProbe`]; separator-led input is resolved
/// against [`Options::base_dir`] or, without one, the process working directory.
/// `:>` walks up through the anchor's own segments, never above that directory
/// (or above the drive root for `X:` input).
pub fn run(input: &str, options: &Options) -> std::result::Result<Report, Error> {
    let mut extractor = Extractor::new(options.slash_mode());
    if let Some(base) = options.base_dir() {
        extractor = extractor.with_base(std::path::absolute(base)?);
    }

    let extraction = extractor.extract(input, &HostProbe)?;
    info!(
        anchor = %extraction.anchor_path().display(),
        action = ?options.action(),
        "running dirfile input"
    );

    // rooted at the input's root so that `:>` can climb through existing prefixes
    let mut fs = DirFS::new(&extraction.anchor.root)?;
    let anchor = extraction.anchor.inner_path();
    let mut driver = Driver::new(&mut fs);
    driver.set_rollback(options.rollback_on_failure());

    match options.action() {
        Action::Create => driver.apply(&anchor, &extraction.arguments, &extraction.operations),
        Action::Delete => driver.remove(&anchor, &extraction.arguments, &extraction.operations),
    }
}
