//! Extraction session: validates a raw input string, finds its anchor directory and
//! splits the remainder into arguments and operations.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::Probe;
use crate::error::Error;
use crate::lang::anchor::{self, Anchor};
use crate::lang::{Argument, ArgumentExtractor, Operation, SlashMode, Validator};

/// Everything one [`Extractor::extract`] call produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub received: String,
    pub anchor: Anchor,
    pub arguments: Vec<Argument>,
    pub operations: Vec<Operation>,
}

impl Extraction {
    pub fn anchor_path(&self) -> &Path {
        &self.anchor.path
    }

    pub fn tail(&self) -> &str {
        &self.anchor.tail
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    mode: SlashMode,
    base: Option<PathBuf>,
    path_validator: Validator,
    arguments: ArgumentExtractor,
}

impl Extractor {
    pub fn new(mode: SlashMode) -> Self {
        Self {
            mode,
            base: None,
            path_validator: Validator::path(mode),
            arguments: ArgumentExtractor::new(mode),
        }
    }

    /// Directory separator-led input is resolved against.
    /// Without one, the current working directory is used.
    pub fn with_base<P: AsRef<Path>>(mut self, base: P) -> Self {
        self.base = Some(base.as_ref().to_path_buf());
        self
    }

    pub fn mode(&self) -> SlashMode {
        self.mode
    }

    /// Whole-string check of a raw input: one separator style, an optional `X:`
    /// drive, then a well-formed argument string.
    pub fn validate(&self, raw: &str) -> Result<(), Error> {
        let input = raw.trim();
        anchor::check_separators(input, self.mode)?;
        let body = match input.as_bytes() {
            [letter, b':', ..] if letter.is_ascii_alphabetic() => &input[2..],
            _ => input,
        };
        if self.arguments.validator().is_invalid(body) {
            return Err(Error::InvalidArgumentString(input.to_string()));
        }
        Ok(())
    }

    pub fn extract<P: Probe>(&self, raw: &str, probe: &P) -> Result<Extraction, Error> {
        self.validate(raw)?;
        let input = raw.trim();

        let base = self.base()?;
        let anchor = anchor::extract(input, self.mode, &base, probe)?;
        if !anchor.text.is_empty() && self.path_validator.is_invalid(anchor.text.trim_end()) {
            return Err(Error::InvalidPath(anchor.text));
        }

        let (arguments, operations) = self.arguments.extract(&anchor.tail)?;
        debug!(
            anchor = %anchor.path.display(),
            arguments = arguments.len(),
            operations = operations.len(),
            "extracted"
        );

        Ok(Extraction {
            received: raw.to_string(),
            anchor,
            arguments,
            operations,
        })
    }

    fn base(&self) -> Result<PathBuf, Error> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HostProbe;
    use crate::error::ErrorKind;
    use tempdir::TempDir;

    fn setup_test_env() -> TempDir {
        TempDir::new("extractor").unwrap()
    }

    mod scenarios {
        use super::*;

        #[test]
        fn test_single_director_anchored_at_base() {
            let temp_dir = setup_test_env();
            let extractor = Extractor::new(SlashMode::Backward).with_base(temp_dir.path());

            let extraction = extractor.extract(r"\testDir", &HostProbe).unwrap();

            assert_eq!(extraction.anchor_path(), temp_dir.path());
            assert!(extraction.operations.is_empty());
            assert_eq!(extraction.arguments, vec![Argument::director("testDir")]);
        }

        #[test]
        fn test_next_and_prev() {
            let temp_dir = setup_test_env();
            let extractor = Extractor::new(SlashMode::Backward).with_base(temp_dir.path());

            let extraction = extractor
                .extract(r"\testDir > testDir2 :> testDir3", &HostProbe)
                .unwrap();

            assert_eq!(extraction.operations, vec![Operation::Next, Operation::Prev]);
            assert_eq!(
                extraction.arguments,
                vec![
                    Argument::director("testDir"),
                    Argument::director("testDir2"),
                    Argument::director("testDir3"),
                ]
            );
        }

        #[test]
        fn test_next_change_prev() {
            let temp_dir = setup_test_env();
            let extractor = Extractor::new(SlashMode::Backward).with_base(temp_dir.path());

            let extraction = extractor
                .extract(r"\testDir > testDir2\testFile.csv :> testDir3", &HostProbe)
                .unwrap();

            assert_eq!(
                extraction.operations,
                vec![Operation::Next, Operation::Change, Operation::Prev]
            );
            assert_eq!(
                extraction.arguments,
                vec![
                    Argument::director("testDir"),
                    Argument::director("testDir2"),
                    Argument::filer("testFile.csv"),
                    Argument::director("testDir3"),
                ]
            );
        }

        #[test]
        fn test_mixed_separators() {
            let temp_dir = setup_test_env();
            let extractor = Extractor::new(SlashMode::Backward).with_base(temp_dir.path());

            let err = extractor
                .extract(r"\testDir > testDir2/testFile.csv :> testDir3", &HostProbe)
                .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Grammar);
            assert!(matches!(err, Error::MixedSeparators { .. }));
        }

        #[test]
        fn test_trailing_operator() {
            let temp_dir = setup_test_env();
            let extractor = Extractor::new(SlashMode::Backward).with_base(temp_dir.path());

            let err = extractor.extract(r"\testDir >", &HostProbe).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Grammar);
        }

        #[test]
        fn test_no_existing_anchor() {
            let temp_dir = setup_test_env();
            let missing = temp_dir.path().join("missing");
            let extractor = Extractor::new(SlashMode::Backward).with_base(&missing);

            let err = extractor.extract(r"\a\b > c", &HostProbe).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::NoExistingAnchor);
        }
    }

    mod anchors {
        use super::*;

        #[test]
        fn test_existing_prefix_becomes_anchor() -> crate::core::Result<()> {
            let temp_dir = setup_test_env();
            std::fs::create_dir_all(temp_dir.path().join("proj/src"))?;
            let extractor = Extractor::new(SlashMode::Forward).with_base(temp_dir.path());

            let extraction = extractor.extract("/proj/src/lib/mod.rs > util.rs", &HostProbe)?;

            assert_eq!(extraction.anchor_path(), temp_dir.path().join("proj/src"));
            assert_eq!(extraction.tail(), "/lib/mod.rs > util.rs");
            assert_eq!(
                extraction.arguments,
                vec![
                    Argument::director("lib"),
                    Argument::filer("mod.rs"),
                    Argument::filer("util.rs"),
                ]
            );
            assert_eq!(extraction.operations, vec![Operation::Change, Operation::Next]);
            Ok(())
        }

        #[test]
        fn test_existing_file_is_not_an_anchor() -> crate::core::Result<()> {
            let temp_dir = setup_test_env();
            std::fs::write(temp_dir.path().join("notes"), b"")?;
            let extractor = Extractor::new(SlashMode::Forward).with_base(temp_dir.path());

            let extraction = extractor.extract("/notes/a > b", &HostProbe)?;

            assert_eq!(extraction.anchor_path(), temp_dir.path());
            assert_eq!(extraction.tail(), "/notes/a > b");
            Ok(())
        }

        #[cfg(unix)]
        #[test]
        fn test_missing_drive_has_no_anchor() {
            let extractor = Extractor::new(SlashMode::Backward).with_base("/");
            let err = extractor.extract(r"Q:\proj\src > x", &HostProbe).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NoExistingAnchor);
        }

        #[test]
        fn test_surrounding_whitespace_is_ignored() {
            let temp_dir = setup_test_env();
            let extractor = Extractor::new(SlashMode::Backward).with_base(temp_dir.path());

            let extraction = extractor.extract("  \\a > b  ", &HostProbe).unwrap();

            assert_eq!(
                extraction.arguments,
                vec![Argument::director("a"), Argument::director("b")]
            );
        }
    }

    mod validate {
        use super::*;

        #[test]
        fn test_validate_without_touching_disk() {
            let extractor = Extractor::new(SlashMode::Backward);
            assert!(extractor.validate(r"C:\proj\src > x").is_ok());
            assert!(extractor.validate(r"\a :> b").is_ok());
            assert!(extractor.validate(r"C:proj").is_err());
            assert!(extractor.validate(r"\a >> b").is_err());
            assert!(extractor.validate("").is_err());
        }
    }
}
