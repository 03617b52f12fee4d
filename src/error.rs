use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the reader, writer and [`DesktopFile`](crate::DesktopFile) can raise.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Lookup of a section that is not part of the parsed data.
    #[error("unknown section: {name:?}")]
    UnknownSection { name: String },
}

#[derive(Debug, Error)]
pub enum IoError {
    /// An empty path was given, or no path is associated with the file being saved.
    #[error("empty path is not permitted")]
    EmptyPath,

    /// The file could not be opened for reading.
    #[error("could not open file: {}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    /// The file could not be created or truncated for writing.
    #[error("could not open file for writing: {}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    /// Reading from or writing to an already open stream failed.
    #[error("stream failure")]
    Stream { source: io::Error },
}

/// A grammar violation, reported with the 1-based line it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    #[must_use]
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("multiple opening [ brackets")]
    MultipleOpeningBrackets,

    #[error("no closing ] bracket in section header")]
    MissingClosingBracket,

    #[error("two or more closing ] brackets in section header")]
    MultipleClosingBrackets,

    #[error("no section in desktop file")]
    NoSection,

    #[error("no = key/value delimiter found")]
    MissingDelimiter,

    #[error("empty keys are not allowed")]
    EmptyKey,

    #[error("key contains invalid character {c:?}")]
    InvalidKeyCharacter { c: char },

    #[error("key {key:?} found more than once")]
    DuplicateKey { key: String },

    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Raised by the typed accessors on [`Entry`](crate::Entry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("value {value:?} of key {key:?} is not a boolean")]
    InvalidBool { key: String, value: String },

    #[error("value {value:?} of key {key:?} is not a valid {expected}")]
    InvalidNumber {
        key: String,
        value: String,
        expected: &'static str,
    },
}
