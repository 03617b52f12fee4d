use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{IoError, Result};
use crate::section::Document;
use crate::util;

/// Serializes a [`Document`] back into desktop file text.
///
/// Sections and their entries are written in insertion order, each section followed by an empty
/// line. Keys and values are trimmed the same way the reader trims them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Writer {
    data: Document,
}

impl Writer {
    #[must_use]
    pub fn new(data: Document) -> Self {
        Self { data }
    }

    /// Returns a copy of the data held by this writer.
    #[must_use]
    pub fn data(&self) -> Document {
        self.data.clone()
    }

    /// Write the document to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Fails with [`IoError::Create`] if the file cannot be opened for writing and with
    /// [`IoError::Stream`] if writing to it fails.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        Serialized(&self.data).save_to_path(path.as_ref())
    }

    /// Write the document to an arbitrary stream.
    ///
    /// # Errors
    ///
    /// Fails with [`IoError::Stream`] if the stream does not accept the data.
    pub fn save_to<W: Write>(&self, writer: W) -> Result<()> {
        Serialized(&self.data).save_to(writer)
    }
}

impl From<Document> for Writer {
    fn from(data: Document) -> Self {
        Self::new(data)
    }
}

impl fmt::Display for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Serialized(&self.data), f)
    }
}

/// Borrowed view that serializes a document without taking a copy of it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Serialized<'a>(pub(crate) &'a Document);

impl Serialized<'_> {
    pub(crate) fn save_to_path(self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(IoError::EmptyPath.into());
        }

        tracing::debug!(path = %path.display(), "saving desktop file");

        let file = File::create(path).map_err(|source| IoError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.save_to(&mut writer)?;
        writer
            .flush()
            .map_err(|source| IoError::Stream { source })?;

        Ok(())
    }

    pub(crate) fn save_to<W: Write>(self, mut writer: W) -> Result<()> {
        write!(writer, "{self}").map_err(|source| IoError::Stream { source })?;
        Ok(())
    }
}

impl fmt::Display for Serialized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, section) in self.0 {
            writeln!(f, "[{name}]")?;

            for (key, entry) in section {
                writeln!(f, "{}={}", util::trim(key), util::trim(entry.value()))?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}
