//! Read, validate, modify and write desktop entry files.
//!
//! ```text
//! [Desktop Entry]
//! Name=Example
//! # comment
//! Exec=run --flag
//! ```
//!
//! Files consist of `[section]` headers followed by `key=value` lines. Keys may only contain
//! `A-Za-z0-9-` and must be unique within their section. Lines starting with `#` or `//` are
//! comments.
//!
//! [`DesktopFile`] is the main entry point. [`Reader`] and [`Writer`] expose the parsing and
//! serialization steps on their own, e.g. for merging the [`Document`]s of two files.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod desktop_file;
mod error;
mod options;
mod parser;
mod section;
mod util;
mod writer;

pub use desktop_file::DesktopFile;
pub use error::{Error, IoError, ParseError, ParseErrorKind, Result, ValueError};
pub use options::{BomHandling, ReaderOptions};
pub use parser::Reader;
pub use section::{Document, Entry, Section};
pub use writer::Writer;
