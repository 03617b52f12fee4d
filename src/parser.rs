use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, IoError, ParseError, ParseErrorKind, Result};
use crate::options::{BomHandling, ReaderOptions};
use crate::section::{Document, Entry, Section};
use crate::util;

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Represents an on-going parse of a desktop file, one physical line at a time.
#[derive(Debug)]
pub(crate) struct Parser<R> {
    reader: R,
    options: ReaderOptions,
    line: usize,
    current_section: Option<usize>,
    sections: Document,
}

impl<R: BufRead> Parser<R> {
    pub(crate) fn new(reader: R, options: ReaderOptions) -> Self {
        Self {
            reader,
            options,
            line: 0,
            current_section: None,
            sections: Document::new(),
        }
    }

    /// Consume the whole stream. Parsing stops at the first grammar violation.
    pub(crate) fn into_document(mut self) -> Result<Document> {
        while let Some(mut bytes) = self.next_line()? {
            if self.line == 1 && bytes.first() == Some(&BOM[0]) {
                match self.options.bom {
                    BomHandling::StopParsing => {
                        tracing::warn!("first line starts with a byte order mark, ignoring the rest of the stream");
                        break;
                    }
                    BomHandling::Strip if bytes.starts_with(BOM) => {
                        _ = bytes.drain(..BOM.len());
                    }
                    BomHandling::Strip => {}
                }
            }

            let Ok(line) = std::str::from_utf8(&bytes) else {
                return Err(self.error(ParseErrorKind::InvalidUtf8).into());
            };
            self.parse_line(line)?;
        }

        Ok(self.sections)
    }

    /// Read the next physical line without its `\n` (or `\r\n`) terminator.
    fn next_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut bytes = Vec::with_capacity(256);
        let read = self
            .reader
            .read_until(b'\n', &mut bytes)
            .map_err(|source| IoError::Stream { source })?;

        if read == 0 {
            return Ok(None);
        }

        if bytes.last() == Some(&b'\n') {
            _ = bytes.pop();
        }
        if bytes.last() == Some(&b'\r') {
            _ = bytes.pop();
        }

        self.line += 1;
        Ok(Some(bytes))
    }

    fn parse_line(&mut self, line: &str) -> std::result::Result<(), ParseError> {
        tracing::trace!(line = self.line, text = line, "processing line");

        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            return Ok(());
        }

        if line.starts_with('[') {
            self.parse_section_header(line)
        } else {
            self.parse_entry(line)
        }
    }

    fn parse_section_header(&mut self, line: &str) -> std::result::Result<(), ParseError> {
        if line.rfind('[') != Some(0) {
            return Err(self.error(ParseErrorKind::MultipleOpeningBrackets));
        }

        let Some(closing) = line.find(']') else {
            return Err(self.error(ParseErrorKind::MissingClosingBracket));
        };

        if line.rfind(']') != Some(closing) {
            return Err(self.error(ParseErrorKind::MultipleClosingBrackets));
        }

        let title = &line[1..closing];
        tracing::debug!(line = self.line, section = title, "opening section");

        // Re-declared sections keep collecting into the existing entries.
        let section = self.sections.entry(title.to_owned());
        let index = section.index();
        section.or_default();

        // An empty title does not open a section; entries after it have nowhere to go.
        self.current_section = (!title.is_empty()).then_some(index);

        Ok(())
    }

    fn parse_entry(&mut self, line: &str) -> std::result::Result<(), ParseError> {
        let Some(index) = self.current_section else {
            return Err(self.error(ParseErrorKind::NoSection));
        };

        let Some((key, value)) = line.split_once('=') else {
            return Err(self.error(ParseErrorKind::MissingDelimiter));
        };

        let key = util::trim(key);
        let value = util::trim(value);

        if key.is_empty() {
            return Err(self.error(ParseErrorKind::EmptyKey));
        }

        if let Some(c) = util::invalid_key_char(key) {
            return Err(self.error(ParseErrorKind::InvalidKeyCharacter { c }));
        }

        let line = self.line;
        let Some((_, section)) = self.sections.get_index_mut(index) else {
            return Err(ParseError::new(line, ParseErrorKind::NoSection));
        };

        if section.contains_key(key) {
            let key = key.to_owned();
            return Err(ParseError::new(line, ParseErrorKind::DuplicateKey { key }));
        }

        section.insert(key.to_owned(), Entry::new(key, value));

        Ok(())
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.line, kind)
    }
}

/// Reads a desktop file into a [`Document`].
///
/// Most callers want [`DesktopFile`](crate::DesktopFile); the reader is useful on its own when
/// working with the raw data, e.g. to merge two files before handing the result to a
/// [`Writer`](crate::Writer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reader {
    path: Option<PathBuf>,
    sections: Document,
}

impl Reader {
    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails with [`IoError::EmptyPath`] for an empty path, [`IoError::Open`] if the file cannot
    /// be opened, and with the first [`ParseError`] found in its contents.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with_options(path, ReaderOptions::default())
    }

    pub fn from_path_with_options(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            return Err(IoError::EmptyPath.into());
        }

        tracing::debug!(path = %path.display(), "reading desktop file");

        let file = File::open(path).map_err(|source| IoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let sections = Parser::new(BufReader::new(file), options).into_document()?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            sections,
        })
    }

    /// Parse a desktop file from an arbitrary stream. The resulting reader has no path.
    ///
    /// # Errors
    ///
    /// Fails with [`IoError::Stream`] if reading fails and with the first [`ParseError`] found.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ReaderOptions::default())
    }

    pub fn from_reader_with_options<R: Read>(reader: R, options: ReaderOptions) -> Result<Self> {
        let sections = Parser::new(BufReader::new(reader), options).into_document()?;

        Ok(Self {
            path: None,
            sections,
        })
    }

    /// Returns `true` if no section has been parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Look up a section by name.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnknownSection`] if the section does not exist, so that a misspelled
    /// name is not mistaken for an empty section.
    pub fn section(&self, name: &str) -> Result<&Section> {
        self.sections.get(name).ok_or_else(|| Error::UnknownSection {
            name: name.to_owned(),
        })
    }

    /// Returns a copy of the parsed data.
    #[must_use]
    pub fn data(&self) -> Document {
        self.sections.clone()
    }

    #[must_use]
    pub fn into_data(self) -> Document {
        self.sections
    }
}
