//! Name classifier: decides whether a bare name token is a directory or a file.

use crate::error::NameError;
use crate::lang::extension::{self, Extension};

pub const MAX_NAME_LEN: usize = 30;

const FORBIDDEN: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];
const BOUNDARY: [char; 4] = [' ', '.', '-', '_'];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NameKind {
    Director,
    Filer,
}

/// Result of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: NameKind,
    pub base_name: String,
    /// Lower-cased dotted extension, empty for directories.
    pub extension_name: String,
    pub extension: Option<&'static Extension>,
}

impl Classified {
    /// The name the entity is created under.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.base_name, self.extension_name)
    }
}

pub fn classify(name: &str) -> Result<Classified, NameError> {
    validate(name)?;

    let Some(dot) = name.rfind('.') else {
        return Ok(director(name));
    };
    match extension::lookup(&name[dot..]) {
        Some(ext) => Ok(Classified {
            kind: NameKind::Filer,
            base_name: name[..dot].to_string(),
            extension_name: name[dot..].to_lowercase(),
            extension: Some(ext),
        }),
        // unknown extension: the dot is part of a directory name
        None => Ok(director(name)),
    }
}

/// Character, boundary and length rules shared by every dirfile name.
pub fn validate(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(NameError::InvalidCharacter(c));
    }
    for c in [name.chars().next(), name.chars().last()].into_iter().flatten() {
        if BOUNDARY.contains(&c) {
            return Err(NameError::InvalidBoundary(c));
        }
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong(len));
    }
    Ok(())
}

fn director(name: &str) -> Classified {
    Classified {
        kind: NameKind::Director,
        base_name: name.to_string(),
        extension_name: String::new(),
        extension: None,
    }
}
