//! Error taxonomy of the extraction pipeline and the driver.
//!
//! Grammar and name errors are raised before any filesystem mutation. Backend
//! failures are carried through unchanged as [`Error::Filesystem`].

use thiserror::Error;

use crate::lang::SlashMode;

/// Broad category of an [`Error`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Grammar,
    InvalidName,
    NoExistingAnchor,
    ExtensionNotFound,
    Filesystem,
}

/// Why a name token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("name contains forbidden character {0:?}")]
    InvalidCharacter(char),
    #[error("name must not start or end with {0:?}")]
    InvalidBoundary(char),
    #[error("name is {0} characters long, the limit is 30")]
    TooLong(usize),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("separator {found:?} is not allowed in {mode} mode (position {position})")]
    MixedSeparators {
        mode: SlashMode,
        found: char,
        position: usize,
    },

    #[error("invalid argument string: {0:?}")]
    InvalidArgumentString(String),

    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    #[error("misplaced operation at {position}: {reason}")]
    MisplacedOperation { position: usize, reason: String },

    #[error("invalid name {name:?}: {source}")]
    InvalidName {
        name: String,
        #[source]
        source: NameError,
    },

    #[error("no existing directory found in {0:?}")]
    NoExistingAnchor(String),

    #[error("extension not found: {0:?}")]
    ExtensionNotFound(String),

    #[error(transparent)]
    Filesystem(#[from] anyhow::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MixedSeparators { .. }
            | Error::InvalidArgumentString(_)
            | Error::InvalidPath(_)
            | Error::MisplacedOperation { .. } => ErrorKind::Grammar,
            Error::InvalidName { .. } => ErrorKind::InvalidName,
            Error::NoExistingAnchor(_) => ErrorKind::NoExistingAnchor,
            Error::ExtensionNotFound(_) => ErrorKind::ExtensionNotFound,
            Error::Filesystem(_) => ErrorKind::Filesystem,
        }
    }

    pub(crate) fn misplaced(position: usize, reason: impl Into<String>) -> Self {
        Error::MisplacedOperation {
            position,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Filesystem(err.into())
    }
}
