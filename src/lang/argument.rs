//! Argument/operation extraction from an argument tail.
//!
//! The tail is consumed left to right: each name token is classified and followed by
//! at most one control token. Quoted text after `:"` is taken verbatim.

use std::fmt;

use tracing::{trace, warn};

use crate::error::Error;
use crate::lang::SlashMode;
use crate::lang::grammar::Validator;
use crate::lang::name::{self, NameKind};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArgumentKind {
    Director,
    Filer,
    InitialText,
}

/// A typed argument in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub kind: ArgumentKind,
    pub value: String,
}

impl Argument {
    pub fn new(kind: ArgumentKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn director(value: impl Into<String>) -> Self {
        Self::new(ArgumentKind::Director, value)
    }

    pub fn filer(value: impl Into<String>) -> Self {
        Self::new(ArgumentKind::Filer, value)
    }

    pub fn initial_text(value: impl Into<String>) -> Self {
        Self::new(ArgumentKind::InitialText, value)
    }
}

/// Structural control token.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `>`: sibling under the same parent.
    Next,
    /// separator: descend into the directory just created.
    Change,
    /// `:>`: ascend one level.
    Prev,
    /// `:"`
    StartText,
    /// closing `"`
    EndText,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Operation::Next => ">",
            Operation::Change => "<sep>",
            Operation::Prev => ":>",
            Operation::StartText => ":\"",
            Operation::EndText => "\"",
        };
        f.write_str(token)
    }
}

/// Tokenizes argument tails for one [`SlashMode`].
#[derive(Debug, Clone)]
pub struct ArgumentExtractor {
    mode: SlashMode,
    validator: Validator,
}

impl ArgumentExtractor {
    pub fn new(mode: SlashMode) -> Self {
        Self {
            mode,
            validator: Validator::argument(mode),
        }
    }

    pub fn mode(&self) -> SlashMode {
        self.mode
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Splits `tail` into arguments and operations. All-or-nothing: any error
    /// discards what was collected so far.
    pub fn extract(&self, tail: &str) -> Result<(Vec<Argument>, Vec<Operation>), Error> {
        if self.validator.is_invalid(tail) {
            return Err(Error::InvalidArgumentString(tail.to_string()));
        }

        let sep = self.mode.separator();
        let mut arguments: Vec<Argument> = Vec::new();
        let mut operations: Vec<Operation> = Vec::new();
        // position in `tail` of the working string, for error reporting
        let mut offset = sep.len_utf8();
        let mut rest = &tail[offset..];

        while !rest.is_empty() {
            if operations.last() == Some(&Operation::StartText) {
                let Some(close) = rest.find('"') else {
                    return Err(Error::InvalidArgumentString(tail.to_string()));
                };
                trace!(text = &rest[..close], "initial text");
                arguments.push(Argument::initial_text(&rest[..close]));
                operations.push(Operation::EndText);
                let after = &rest[close + 1..];
                offset += close + 1;

                let (idx, operation, len) = match operation_after_text(after, sep) {
                    Ok(Some(found)) => found,
                    Ok(None) => break,
                    Err((idx, reason)) => return Err(Error::misplaced(offset + idx, reason)),
                };
                self.push_operation(&mut operations, &arguments, operation, offset + idx)?;
                offset += idx + len;
                rest = &after[idx + len..];
                continue;
            }

            let idx = rest.find([sep, '>', ':', '"']);
            let token = rest[..idx.unwrap_or(rest.len())].trim();
            arguments.push(classify(token)?);

            let Some(idx) = idx else {
                break;
            };
            let Some((operation, len)) = operation_at(&rest[idx..], sep) else {
                return Err(Error::InvalidArgumentString(tail.to_string()));
            };
            self.push_operation(&mut operations, &arguments, operation, offset + idx)?;
            offset += idx + len;
            rest = &rest[idx + len..];
        }

        Ok((arguments, operations))
    }

    fn push_operation(
        &self,
        operations: &mut Vec<Operation>,
        arguments: &[Argument],
        operation: Operation,
        position: usize,
    ) -> Result<(), Error> {
        let last = arguments.last().map(|arg| arg.kind);
        let last_dirfile = arguments
            .iter()
            .rev()
            .find(|arg| arg.kind != ArgumentKind::InitialText)
            .map(|arg| arg.kind);
        match operation {
            Operation::Change if last_dirfile == Some(ArgumentKind::Filer) => {
                return Err(Error::misplaced(position, "cannot descend into a file"));
            }
            Operation::StartText if last != Some(ArgumentKind::Filer) => {
                return Err(Error::misplaced(position, "text block must follow a file"));
            }
            Operation::EndText => {
                return Err(Error::misplaced(position, "closing quote without text block"));
            }
            _ => {}
        }
        trace!(%operation, position, "operation");
        operations.push(operation);
        Ok(())
    }
}

fn classify(token: &str) -> Result<Argument, Error> {
    let classified = name::classify(token).map_err(|source| Error::InvalidName {
        name: token.to_string(),
        source,
    })?;
    trace!(token, kind = ?classified.kind, "name");
    Ok(match classified.kind {
        NameKind::Director => Argument::director(classified.base_name),
        NameKind::Filer => Argument::filer(classified.full_name()),
    })
}

/// Decodes the control token at the start of `s` and its byte length.
fn operation_at(s: &str, sep: char) -> Option<(Operation, usize)> {
    let mut chars = s.chars();
    match chars.next()? {
        c if c == sep => Some((Operation::Change, c.len_utf8())),
        '>' => Some((Operation::Next, 1)),
        ':' => match chars.next()? {
            '>' => Some((Operation::Prev, 2)),
            '"' => Some((Operation::StartText, 2)),
            _ => None,
        },
        '"' => Some((Operation::EndText, 1)),
        _ => None,
    }
}

/// Finds the structural operator following a closing quote, as
/// `(index, operation, length)`. Anything before it is dropped with a warning.
fn operation_after_text(
    after: &str,
    sep: char,
) -> Result<Option<(usize, Operation, usize)>, (usize, &'static str)> {
    let Some(idx) = after.find([sep, '>', ':']) else {
        ignore_after_quote(after);
        return Ok(None);
    };
    ignore_after_quote(&after[..idx]);
    match operation_at(&after[idx..], sep) {
        Some((Operation::StartText, _)) => Err((idx, "text block already closed")),
        Some((operation, len)) => Ok(Some((idx, operation, len))),
        None => Err((idx, "expected a separator, '>' or ':>' after a text block")),
    }
}

fn ignore_after_quote(dropped: &str) {
    if !dropped.trim().is_empty() {
        warn!(dropped, "ignoring characters after closing quote");
    }
}
