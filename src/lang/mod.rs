//! The Dirfile mini-language: separators, names, extensions, grammar, and the two
//! extraction stages (anchor search, argument tokenizing).

pub mod anchor;
pub mod argument;
pub mod extension;
pub mod grammar;
pub mod name;
mod slash;

pub use anchor::Anchor;
pub use argument::{Argument, ArgumentExtractor, ArgumentKind, Operation};
pub use extension::{Category, Extension};
pub use grammar::{Grammar, Validator};
pub use name::{Classified, NameKind, classify};
pub use slash::SlashMode;
