use std::fmt;
use std::str::FromStr;

/// Which single path separator is legal in an input string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SlashMode {
    /// `\`
    Backward,
    /// `/`
    Forward,
}

impl SlashMode {
    /// The separator used by the host platform.
    pub fn native() -> Self {
        if cfg!(windows) {
            SlashMode::Backward
        } else {
            SlashMode::Forward
        }
    }

    /// Separator accepted in this mode.
    pub fn separator(self) -> char {
        match self {
            SlashMode::Backward => '\\',
            SlashMode::Forward => '/',
        }
    }

    /// Separator rejected in this mode.
    pub fn other(self) -> char {
        match self {
            SlashMode::Backward => '/',
            SlashMode::Forward => '\\',
        }
    }

    /// Returns the first foreign separator found outside quoted text, if any.
    pub fn find_foreign(self, input: &str) -> Option<usize> {
        let other = self.other();
        let mut quoted = false;
        for (idx, c) in input.char_indices() {
            if c == '"' {
                quoted = !quoted;
            } else if c == other && !quoted {
                return Some(idx);
            }
        }
        None
    }
}

impl Default for SlashMode {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for SlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlashMode::Backward => write!(f, "backward"),
            SlashMode::Forward => write!(f, "forward"),
        }
    }
}

impl FromStr for SlashMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backward" | "back" | "\\" => Ok(SlashMode::Backward),
            "forward" | "fwd" | "/" => Ok(SlashMode::Forward),
            other => Err(format!("unknown slash mode: {other:?}")),
        }
    }
}
