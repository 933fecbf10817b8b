//! Error types for save-file parsing.

use thiserror::Error;

/// Errors that abort a parse.
///
/// Every variant except [`ParseError::Read`] carries the 1-based line number
/// where the error was detected. The parser keeps whatever partial tree it had
/// accumulated before failing; see [`crate::Parser::root`].
#[derive(Error, Debug)]
pub enum ParseError {
    /// A token unsuitable as a key appeared where a key was expected.
    #[error("invalid key at line {line}: {literal:?}")]
    InvalidKey { line: u64, literal: String },

    /// A single block accumulated both keyed entries and bare array elements.
    #[error("mixed nested structure at line {line}: block holds both keyed and bare entries")]
    MixedNested { line: u64 },

    /// A token classified as an integer or float literal failed numeric
    /// conversion (including 32-bit float overflow to infinity).
    #[error("malformed numeric literal at line {line}: {literal:?}")]
    MalformedNumeric { line: u64, literal: String },

    /// The underlying character source could not be read.
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}

/// Convenience alias used throughout savtree-core.
pub type Result<T> = std::result::Result<T, ParseError>;
