//! Anchor path search.
//!
//! Splits an input string into the longest prefix naming an existing directory
//! (the anchor) and the argument tail describing what is still to be created.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use tracing::{debug, trace};

use crate::core::Probe;
use crate::error::Error;
use crate::lang::SlashMode;

/// Result of the anchor search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Directory the leading separator (or drive) of the input stands for.
    pub root: PathBuf,
    /// Existing directory the tail is created under, `root` or below it.
    pub path: PathBuf,
    /// Input prefix the anchor was derived from (empty when it is the base directory).
    pub text: String,
    /// Remainder of the input, starting with a separator.
    pub tail: String,
}

impl Anchor {
    /// `path` as seen from `root`: `/` followed by the prefix segments.
    pub fn inner_path(&self) -> PathBuf {
        match self.path.strip_prefix(&self.root) {
            Ok(relative) => Path::new("/").join(relative),
            Err(_) => PathBuf::from("/"),
        }
    }
}

/// Fails if the separator foreign to `mode` appears outside quoted text.
pub fn check_separators(raw: &str, mode: SlashMode) -> Result<(), Error> {
    match mode.find_foreign(raw) {
        Some(position) => Err(Error::MixedSeparators {
            mode,
            found: mode.other(),
            position,
        }),
        None => Ok(()),
    }
}

/// Walks the input backward from its first operator, testing each separator-bounded
/// prefix until one names an existing directory.
///
/// Separator-led input is resolved against `base`; drive-led input (`X:`) against the
/// drive root. The last segment before the first operator always belongs to the tail.
pub fn extract<P: Probe>(
    raw: &str,
    mode: SlashMode,
    base: &Path,
    probe: &P,
) -> Result<Anchor, Error> {
    check_separators(raw, mode)?;

    let sep = mode.separator();
    let drive = drive_prefix(raw);
    let body_start = drive.map_or(0, str::len);
    let limit = raw[body_start..]
        .find(['>', ':', '"'])
        .map_or(raw.len(), |idx| idx + body_start);

    let separators: Vec<usize> = raw[..limit]
        .match_indices(sep)
        .map(|(idx, _)| idx)
        .filter(|&idx| idx >= body_start)
        .collect();
    if separators.is_empty() {
        return Err(Error::InvalidPath(raw.to_string()));
    }

    let root = match drive {
        Some(drive) => PathBuf::from(format!("{drive}{MAIN_SEPARATOR}")),
        None => base.to_path_buf(),
    };
    for &pos in separators.iter().rev() {
        let text = &raw[..pos];
        let path = candidate_path(&text[body_start..], sep, &root);
        trace!(candidate = %path.display(), "probing anchor candidate");
        if probe.dir_exists(&path) {
            debug!(anchor = %path.display(), tail = &raw[pos..], "anchor found");
            return Ok(Anchor {
                root,
                path,
                text: text.to_string(),
                tail: raw[pos..].to_string(),
            });
        }
    }

    Err(Error::NoExistingAnchor(raw.to_string()))
}

fn drive_prefix(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Some(&raw[..2])
    } else {
        None
    }
}

fn candidate_path(text: &str, sep: char, root: &Path) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in text.split(sep).map(str::trim).filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}
