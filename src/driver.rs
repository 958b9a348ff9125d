//! Replays extracted arguments and operations against a filesystem backend.
//!
//! The cursor walk is computed up front by [`plan`], so structural mistakes are
//! reported before anything is created. The [`Driver`] then performs each step
//! through an [`FsBackend`].

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use tracing::{debug, error, info, warn};

use crate::core::{FsBackend, utils};
use crate::error::Error;
use crate::lang::{Argument, ArgumentKind, Operation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    Director,
    Filer,
    /// Full contents for the file at the step path.
    Text(String),
}

/// One filesystem effect, with its path relative to the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    pub path: PathBuf,
}

/// Walks `operations` with a cursor starting at the anchor and returns the ordered
/// steps.
///
/// Step paths are relative to the anchor. `Prev` may climb above it, in which case the
/// path starts with `..` components; the backend resolves them against the anchor's
/// own segments.
pub fn plan(arguments: &[Argument], operations: &[Operation]) -> Result<Vec<Step>, Error> {
    let mut steps = Vec::new();
    let mut args = arguments.iter();
    let Some(first) = args.next() else {
        if let Some(op) = operations.first() {
            return Err(Error::misplaced(0, format!("'{op}' without an argument")));
        }
        return Ok(steps);
    };

    let mut cursor = PathBuf::new();
    let mut last = place(first, &cursor, &mut steps, 0)?;
    let mut in_text = false;

    for (position, &operation) in operations.iter().enumerate() {
        if operation == Operation::EndText {
            if !in_text {
                return Err(Error::misplaced(position, "closing quote without text block"));
            }
            in_text = false;
            continue;
        }
        if in_text {
            return Err(Error::misplaced(position, "text block is not closed"));
        }
        let Some(argument) = args.next() else {
            return Err(Error::misplaced(position, format!("'{operation}' without an argument")));
        };

        match operation {
            Operation::Change => {
                if last.0 != ArgumentKind::Director {
                    return Err(Error::misplaced(position, "cannot descend into a file"));
                }
                cursor = last.1.clone();
                last = place(argument, &cursor, &mut steps, position)?;
            }
            Operation::Next => {
                last = place(argument, &cursor, &mut steps, position)?;
            }
            Operation::Prev => {
                ascend(&mut cursor);
                last = place(argument, &cursor, &mut steps, position)?;
            }
            Operation::StartText => {
                if last.0 != ArgumentKind::Filer || argument.kind != ArgumentKind::InitialText {
                    return Err(Error::misplaced(position, "text block must follow a file"));
                }
                steps.push(Step {
                    kind: StepKind::Text(argument.value.clone()),
                    path: last.1.clone(),
                });
                in_text = true;
            }
            Operation::EndText => unreachable!("handled above"),
        }
    }

    if in_text {
        return Err(Error::misplaced(operations.len(), "text block is not closed"));
    }
    if args.next().is_some() {
        return Err(Error::misplaced(
            operations.len(),
            "more arguments than operations",
        ));
    }
    Ok(steps)
}

fn ascend(cursor: &mut PathBuf) {
    match cursor.components().next_back() {
        Some(Component::Normal(_)) => {
            cursor.pop();
        }
        _ => cursor.push(".."),
    }
}

fn place(
    argument: &Argument,
    cursor: &Path,
    steps: &mut Vec<Step>,
    position: usize,
) -> Result<(ArgumentKind, PathBuf), Error> {
    let kind = match argument.kind {
        ArgumentKind::Director => StepKind::Director,
        ArgumentKind::Filer => StepKind::Filer,
        ArgumentKind::InitialText => {
            return Err(Error::misplaced(position, "text outside of a text block"));
        }
    };
    let path = cursor.join(&argument.value);
    steps.push(Step {
        kind,
        path: path.clone(),
    });
    Ok((argument.kind, path))
}

/// What happened to one path.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
    Written,
    Removed,
    Missing,
}

/// Per-path outcomes in execution order. Paths are backend paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    entries: Vec<(PathBuf, Outcome)>,
}

impl Report {
    pub fn entries(&self) -> &[(PathBuf, Outcome)] {
        &self.entries
    }

    pub fn with_outcome(&self, outcome: Outcome) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(move |(_, o)| *o == outcome)
            .map(|(path, _)| path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, path: PathBuf, outcome: Outcome) {
        self.entries.push((path, outcome));
    }
}

/// Compensating action for one effect of [`Driver::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Undo {
    Remove(PathBuf),
    Restore(PathBuf, Vec<u8>),
}

pub struct Driver<'a, B: FsBackend> {
    backend: &'a mut B,
    rollback: bool,
}

impl<'a, B: FsBackend> Driver<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        Self {
            backend,
            rollback: false,
        }
    }

    /// On failure, undo this run newest first: created entities are removed and files
    /// whose contents were replaced by a text block get their previous bytes back.
    pub fn set_rollback(&mut self, rollback: bool) {
        self.rollback = rollback;
    }

    /// Creates the dirfiles described by `arguments`/`operations` under `anchor`.
    ///
    /// Existing directories and files are left as they are. Text blocks replace the
    /// contents of their file. `Prev` steps climbing above `anchor` resolve against
    /// its parents; the backend root is the ceiling. Without rollback, entities created
    /// before a failure stay on disk.
    pub fn apply<P: AsRef<Path>>(
        &mut self,
        anchor: P,
        arguments: &[Argument],
        operations: &[Operation],
    ) -> Result<Report, Error> {
        let steps = plan(arguments, operations)?;
        self.backend.cd(anchor)?;
        let anchor = self.backend.cwd().to_path_buf();

        let mut report = Report::default();
        let mut journal: Vec<Undo> = Vec::new();
        for step in &steps {
            let path = utils::normalize(anchor.join(&step.path));
            match self.create(step, &path, &mut journal) {
                Ok(outcome) => report.push(path, outcome),
                Err(err) => {
                    error!(path = %path.display(), error = %err, "step failed");
                    if self.rollback {
                        self.undo(&journal);
                    }
                    return Err(err
                        .context(format!("unable to create {}", path.display()))
                        .into());
                }
            }
        }
        Ok(report)
    }

    /// Removes the dirfiles described by `arguments`/`operations` under `anchor`,
    /// deepest first. Missing entities are skipped.
    pub fn remove<P: AsRef<Path>>(
        &mut self,
        anchor: P,
        arguments: &[Argument],
        operations: &[Operation],
    ) -> Result<Report, Error> {
        let steps = plan(arguments, operations)?;
        self.backend.cd(anchor)?;
        let anchor = self.backend.cwd().to_path_buf();

        let mut report = Report::default();
        for step in steps.iter().rev() {
            if let StepKind::Text(_) = step.kind {
                continue;
            }
            let path = utils::normalize(anchor.join(&step.path));
            if !self.backend.exists(&path) {
                debug!(path = %path.display(), "nothing to remove");
                report.push(path, Outcome::Missing);
                continue;
            }
            self.backend
                .rm(&path)
                .with_context(|| format!("unable to remove {}", path.display()))?;
            info!(path = %path.display(), "removed");
            report.push(path, Outcome::Removed);
        }
        Ok(report)
    }

    fn create(
        &mut self,
        step: &Step,
        path: &Path,
        journal: &mut Vec<Undo>,
    ) -> anyhow::Result<Outcome> {
        match &step.kind {
            StepKind::Director => {
                if self.backend.exists(path) {
                    if !self.backend.is_dir(path)? {
                        bail!("{} exists and is not a directory", path.display());
                    }
                    debug!(path = %path.display(), "directory already exists");
                    return Ok(Outcome::AlreadyExists);
                }
                self.backend.mkdir(path)?;
                journal.push(Undo::Remove(path.to_path_buf()));
                info!(path = %path.display(), "created directory");
                Ok(Outcome::Created)
            }
            StepKind::Filer => {
                if self.backend.exists(path) {
                    if !self.backend.is_file(path)? {
                        bail!("{} exists and is not a file", path.display());
                    }
                    debug!(path = %path.display(), "file already exists");
                    return Ok(Outcome::AlreadyExists);
                }
                self.backend.mkfile(path, None)?;
                journal.push(Undo::Remove(path.to_path_buf()));
                info!(path = %path.display(), "created file");
                Ok(Outcome::Created)
            }
            StepKind::Text(content) => {
                if !self.backend.exists(path) {
                    return Err(anyhow!("{} does not exist", path.display()));
                }
                if self.rollback {
                    let previous = self.backend.read(path)?;
                    journal.push(Undo::Restore(path.to_path_buf(), previous));
                }
                self.backend.write(path, content.as_bytes())?;
                info!(path = %path.display(), bytes = content.len(), "wrote initial text");
                Ok(Outcome::Written)
            }
        }
    }

    fn undo(&mut self, journal: &[Undo]) {
        for action in journal.iter().rev() {
            let (path, result) = match action {
                Undo::Remove(path) if self.backend.exists(path) => {
                    (path, self.backend.rm(path))
                }
                Undo::Restore(path, bytes) if self.backend.exists(path) => {
                    (path, self.backend.write(path, bytes))
                }
                _ => continue,
            };
            match result {
                Ok(()) => warn!(path = %path.display(), "rolled back"),
                Err(err) => error!(path = %path.display(), error = %err, "rollback failed"),
            }
        }
    }
}
