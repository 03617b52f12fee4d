use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{IoError, Result};
use crate::options::ReaderOptions;
use crate::parser::Reader;
use crate::section::{Document, Entry, Section};
use crate::util;
use crate::writer::Serialized;

/// A desktop file, optionally associated with a location on disk.
///
/// Two desktop files are equal if their contents are equal, regardless of their paths.
#[derive(Debug, Clone, Default)]
pub struct DesktopFile {
    path: Option<PathBuf>,
    document: Document,
    options: ReaderOptions,
}

impl DesktopFile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: ReaderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Read the desktop file at `path` and associate it with that path.
    ///
    /// # Errors
    ///
    /// See [`DesktopFile::read`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = Self::new();
        file.read(path)?;
        Ok(file)
    }

    /// Parse a desktop file from a stream. The result has no associated path.
    ///
    /// # Errors
    ///
    /// See [`DesktopFile::read_from`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut file = Self::new();
        file.read_from(reader)?;
        Ok(file)
    }

    /// Returns `true` if the file has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Replace the contents with the desktop file at `path` and remember the path.
    ///
    /// # Errors
    ///
    /// Returns the [`Reader`]'s I/O and parse errors unchanged. On failure the current contents
    /// and path are kept.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let reader = Reader::from_path_with_options(path.as_ref(), self.options)?;
        self.path = reader.path().map(Path::to_path_buf);
        self.document = reader.into_data();
        Ok(())
    }

    /// Replace the contents with a desktop file read from a stream. The path is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`Reader`]'s I/O and parse errors unchanged.
    pub fn read_from<R: Read>(&mut self, reader: R) -> Result<()> {
        self.document = Reader::from_reader_with_options(reader, self.options)?.into_data();
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Associate the file with `path`, which [`DesktopFile::save`] writes to.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Drop all contents and the associated path.
    pub fn clear(&mut self) {
        self.path = None;
        self.document.clear();
    }

    /// Write the file to its associated path.
    ///
    /// # Errors
    ///
    /// Fails with [`IoError::EmptyPath`] if no path is associated, otherwise as
    /// [`Writer::save_to_path`](crate::Writer::save_to_path).
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.save_to_path(path),
            None => Err(IoError::EmptyPath.into()),
        }
    }

    /// Write the file to `path` without changing the associated path.
    ///
    /// # Errors
    ///
    /// See [`Writer::save_to_path`](crate::Writer::save_to_path).
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        Serialized(&self.document).save_to_path(path.as_ref())
    }

    /// Write the file to a stream.
    ///
    /// # Errors
    ///
    /// See [`Writer::save_to`](crate::Writer::save_to).
    pub fn save_to<W: Write>(&self, writer: W) -> Result<()> {
        Serialized(&self.document).save_to(writer)
    }

    #[must_use]
    pub fn entry_exists(&self, section: &str, key: &str) -> bool {
        self.get_entry(section, key).is_some()
    }

    #[must_use]
    pub fn get_entry(&self, section: &str, key: &str) -> Option<&Entry> {
        self.document.get(section)?.get(key)
    }

    /// Insert `entry` into `section`, creating the section if needed.
    ///
    /// Returns `true` if an existing entry with the same key was replaced.
    pub fn set_entry(&mut self, section: impl Into<String>, entry: Entry) -> bool {
        self.document
            .entry(section.into())
            .or_default()
            .insert(entry.key().to_owned(), entry)
            .is_some()
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.document.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.document
            .iter()
            .map(|(name, section)| (name.as_str(), section))
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Check that the contents would be written and read back unchanged: every key is non-empty,
    /// made of `A-Za-z0-9-` and matches the key it is stored under; section names contain no
    /// brackets; nothing contains a line break.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.document.iter().all(|(name, section)| {
            if name.contains(['[', ']', '\n', '\r']) {
                tracing::debug!(section = %name, "invalid section name");
                return false;
            }

            section.iter().all(|(key, entry)| {
                let valid = !key.is_empty()
                    && key == entry.key()
                    && util::invalid_key_char(key).is_none()
                    && !entry.value().contains(['\n', '\r']);

                if !valid {
                    tracing::debug!(section = %name, key = %key, "invalid entry");
                }

                valid
            })
        })
    }
}

impl PartialEq for DesktopFile {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document
    }
}

impl Eq for DesktopFile {}

impl From<Document> for DesktopFile {
    fn from(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }
}

impl fmt::Display for DesktopFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Serialized(&self.document), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ParseErrorKind};
    use crate::options::BomHandling;

    const EXAMPLE: &[u8] = b"[Desktop Entry]\nName=Example\n# comment\nExec=run --flag\n";

    fn example() -> DesktopFile {
        DesktopFile::from_reader(EXAMPLE).expect("failed to parse hardcoded desktop file")
    }

    #[test]
    fn new_file_is_empty() {
        let file = DesktopFile::new();

        assert!(file.is_empty());
        assert_eq!(file.path(), None);
        assert!(file.validate());
    }

    #[test]
    fn get_and_check_entries() {
        let file = example();

        assert!(file.entry_exists("Desktop Entry", "Name"));
        assert!(!file.entry_exists("Desktop Entry", "Icon"));
        assert!(!file.entry_exists("Missing", "Name"));
        assert_eq!(
            file.get_entry("Desktop Entry", "Exec"),
            Some(&Entry::new("Exec", "run --flag"))
        );
        assert_eq!(file.get_entry("Missing", "Exec"), None);
    }

    #[test]
    fn set_entry_overwrites() {
        let mut file = DesktopFile::new();

        assert!(!file.set_entry("Desktop Entry", Entry::new("Name", "First")));
        assert!(file.set_entry("Desktop Entry", Entry::new("Name", "Second")));
        assert_eq!(
            file.get_entry("Desktop Entry", "Name").map(Entry::value),
            Some("Second")
        );
        assert_eq!(file.section("Desktop Entry").map(Section::len), Some(1));
    }

    #[test]
    fn validate_rejects_bad_keys() {
        let mut file = example();
        assert!(file.validate());

        file.set_entry("Desktop Entry", Entry::new("Bad_Key", "x"));
        assert!(!file.validate());
    }

    #[test]
    fn validate_rejects_values_that_would_not_round_trip() {
        let mut file = DesktopFile::new();
        file.set_entry("Desktop Entry", Entry::new("Comment", "two\nlines"));
        assert!(!file.validate());

        let mut file = DesktopFile::new();
        file.set_entry("Desktop]Entry", Entry::new("Name", "x"));
        assert!(!file.validate());

        let mut file = DesktopFile::new();
        file.set_entry("Desktop Entry", Entry::new("", "x"));
        assert!(!file.validate());
    }

    #[test]
    fn clear_resets_path_and_contents() {
        let mut file = example();
        file.set_path("/tmp/example.desktop");

        file.clear();

        assert!(file.is_empty());
        assert_eq!(file.path(), None);
    }

    #[test]
    fn save_without_path_fails() {
        assert!(matches!(
            example().save(),
            Err(Error::Io(IoError::EmptyPath))
        ));
    }

    #[test]
    fn equality_ignores_path() {
        let mut first = example();
        let second = example();
        first.set_path("/somewhere/else.desktop");

        assert_eq!(first, second);

        first.set_entry("Desktop Entry", Entry::new("Icon", "example"));
        assert_ne!(first, second);
    }

    #[test]
    fn clones_are_independent() {
        let original = example();
        let mut copy = original.clone();

        copy.set_entry("Desktop Entry", Entry::new("Name", "Changed"));

        assert_eq!(
            original.get_entry("Desktop Entry", "Name").map(Entry::value),
            Some("Example")
        );
    }

    #[test]
    fn round_trip_through_stream() {
        let file = example();
        let mut buffer = Vec::new();
        file.save_to(&mut buffer).expect("writing to a Vec cannot fail");

        let reread = DesktopFile::from_reader(buffer.as_slice()).expect("failed to parse output");

        assert_eq!(file, reread);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "[Desktop Entry]\nName=Example\nExec=run --flag\n\n"
        );
    }

    #[test]
    fn read_errors_are_not_translated() {
        let mut file = DesktopFile::new();
        let error = file
            .read_from(&b"[Desktop Entry]\nfoo=bar\nfoo=baz\n"[..])
            .expect_err("duplicate keys must be rejected");

        assert!(matches!(
            error,
            Error::Parse(ref e) if e.line == 3 && e.kind == ParseErrorKind::DuplicateKey { key: "foo".to_owned() }
        ));
    }

    #[test]
    fn non_utf8_input_is_rejected_instead_of_rewritten() {
        let mut file = example();

        let error = file
            .read_from(&b"[Desktop Entry]\nName=Caf\xE9\n"[..])
            .expect_err("invalid UTF-8 must be rejected");

        assert!(matches!(
            error,
            Error::Parse(ref e) if e.line == 2 && e.kind == ParseErrorKind::InvalidUtf8
        ));
        assert_eq!(file, example());
    }

    #[test]
    fn display_matches_saved_output() {
        let file = example();
        let mut buffer = Vec::new();
        file.save_to(&mut buffer).expect("writing to a Vec cannot fail");

        assert_eq!(file.to_string().into_bytes(), buffer);
    }

    #[test]
    fn options_apply_to_later_reads() {
        let mut file = DesktopFile::with_options(ReaderOptions::new().bom(BomHandling::Strip));

        file.read_from(&b"\xEF\xBB\xBF[Desktop Entry]\nName=x\n"[..])
            .expect("failed to parse hardcoded desktop file");

        assert!(file.entry_exists("Desktop Entry", "Name"));
    }

    #[test]
    fn read_save_and_reread_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.desktop");
        let copy = dir.path().join("copy.desktop");
        std::fs::write(&path, EXAMPLE).unwrap();

        let mut file = DesktopFile::open(&path).expect("failed to read desktop file");
        assert_eq!(file.path(), Some(path.as_path()));

        file.set_entry("Desktop Entry", Entry::new("Icon", "example"));
        file.save_to_path(&copy).expect("failed to save copy");
        assert_eq!(file.path(), Some(path.as_path()));

        file.save().expect("failed to save desktop file");

        let original = DesktopFile::open(&path).expect("failed to reread desktop file");
        let copied = DesktopFile::open(&copy).expect("failed to read copy");
        assert_eq!(original, copied);
        assert!(original.entry_exists("Desktop Entry", "Icon"));
    }

    #[test]
    fn failed_read_keeps_previous_state() {
        let mut file = example();
        file.set_path("/tmp/kept.desktop");

        assert!(file.read("").is_err());
        assert_eq!(file, example());
        assert_eq!(file.path(), Some(Path::new("/tmp/kept.desktop")));
    }
}
