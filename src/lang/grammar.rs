//! Whole-string grammar checks for path and argument strings.
//!
//! A [`Validator`] is an immutable value compiled for one [`Grammar`] and one
//! [`SlashMode`]; it holds no state between calls.

use regex::Regex;

use crate::lang::SlashMode;

/// Characters that never appear in a name segment.
const SEGMENT_CHARS: &str = r#"[^\\/:*?"<>|]"#;
const SEGMENT_NON_SPACE: &str = r#"[^\\/:*?"<>|\s]"#;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Grammar {
    /// `X:` and/or `<sep><segment>` groups, no operators.
    Path,
    /// `<sep><segment>` followed by `<op><segment>` groups, with optional
    /// `:"text"` blocks after a segment.
    Argument,
}

#[derive(Debug, Clone)]
pub struct Validator {
    grammar: Grammar,
    mode: SlashMode,
    regex: Regex,
}

impl Validator {
    pub fn new(grammar: Grammar, mode: SlashMode) -> Self {
        let pattern = match grammar {
            Grammar::Path => path_pattern(mode),
            Grammar::Argument => argument_pattern(mode),
        };
        // safe unwrap(): the pattern is assembled from constant pieces
        let regex = Regex::new(&pattern).unwrap();
        Self {
            grammar,
            mode,
            regex,
        }
    }

    pub fn path(mode: SlashMode) -> Self {
        Self::new(Grammar::Path, mode)
    }

    pub fn argument(mode: SlashMode) -> Self {
        Self::new(Grammar::Argument, mode)
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn mode(&self) -> SlashMode {
        self.mode
    }

    pub fn is_valid(&self, s: &str) -> bool {
        if s.is_empty() || (self.grammar == Grammar::Path && s.ends_with(char::is_whitespace)) {
            return false;
        }
        self.regex.is_match(s)
    }

    pub fn is_invalid(&self, s: &str) -> bool {
        !self.is_valid(s)
    }
}

fn segment() -> String {
    format!("{SEGMENT_CHARS}*{SEGMENT_NON_SPACE}{SEGMENT_CHARS}*")
}

fn path_pattern(mode: SlashMode) -> String {
    let sep = regex::escape(&mode.separator().to_string());
    let segment = segment();
    format!(r"^(?:[A-Za-z]:(?:{sep}{segment})*|(?:{sep}{segment})+)$")
}

fn argument_pattern(mode: SlashMode) -> String {
    let sep = regex::escape(&mode.separator().to_string());
    let segment = segment();
    // characters between a closing quote and the next operator are tolerated
    let unit = format!(r#"{segment}(?::"[^"]*"{SEGMENT_CHARS}*)?"#);
    format!(r"^{sep}{unit}(?:(?:{sep}|>|:>){unit})*$")
}
