use std::path::{Path, PathBuf};

use crate::lang::SlashMode;

/// What [`run`](crate::run) does with the extracted dirfiles.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    #[default]
    Create,
    Delete,
}

/// Settings for one [`run`](crate::run) call.
///
/// ```
/// use dirfile_kit::{Action, Options, SlashMode};
///
/// let mut options = Options::new();
/// options.set_slash_mode(SlashMode::Forward);
/// options.set_action(Action::Delete);
/// assert!(!options.rollback_on_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    slash_mode: SlashMode,
    base_dir: Option<PathBuf>,
    action: Action,
    rollback_on_failure: bool,
}

impl Options {
    /// Native separator style, process cwd as base, create without rollback.
    pub fn new() -> Self {
        Self {
            slash_mode: SlashMode::native(),
            base_dir: None,
            action: Action::Create,
            rollback_on_failure: false,
        }
    }

    pub fn slash_mode(&self) -> SlashMode {
        self.slash_mode
    }

    pub fn set_slash_mode(&mut self, mode: SlashMode) {
        self.slash_mode = mode;
    }

    /// Directory separator-led input is resolved against, if not the process cwd.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn set_base_dir<P: AsRef<Path>>(&mut self, base_dir: P) {
        self.base_dir = Some(base_dir.as_ref().to_path_buf());
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn set_action(&mut self, action: Action) {
        self.action = action;
    }

    pub fn rollback_on_failure(&self) -> bool {
        self.rollback_on_failure
    }

    /// Changes rollback flag.
    /// If the flag is true, entities created by a failed run are removed again.
    pub fn set_rollback_on_failure(&mut self, rollback: bool) {
        self.rollback_on_failure = rollback;
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
