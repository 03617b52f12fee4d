use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::ValueError;
use crate::util;

/// The entries of a single section, keyed by entry key.
///
/// Lookups and equality ignore order; the writer emits entries in insertion order.
pub type Section = IndexMap<String, Entry>;

/// All sections of a desktop file, keyed by section name.
pub type Document = IndexMap<String, Section>;

/// A single `key=value` pair.
///
/// The value is stored as the raw string found in the file. The typed accessors interpret it on
/// demand and never modify it. Constructing an entry does not validate the key; the reader does
/// that while parsing and [`DesktopFile::validate`](crate::DesktopFile::validate) does it for
/// entries built in code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Entry {
    key: String,
    value: String,
}

impl Entry {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Interpret the value as a boolean. Only the literal strings `true` and `false` are accepted.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self.value.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ValueError::InvalidBool {
                key: self.key.clone(),
                value: self.value.clone(),
            }),
        }
    }

    pub fn as_int(&self) -> Result<i32, ValueError> {
        self.parse_number("32-bit integer")
    }

    pub fn as_long(&self) -> Result<i64, ValueError> {
        self.parse_number("64-bit integer")
    }

    pub fn as_double(&self) -> Result<f64, ValueError> {
        self.parse_number("floating point number")
    }

    /// Interpret the value as a `;`-separated list, e.g. `Categories=GTK;Utility;`.
    ///
    /// `\;` stands for a literal semicolon. A trailing `;` does not add an empty element.
    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        util::split_list(&self.value)
    }

    fn parse_number<T: FromStr>(&self, expected: &'static str) -> Result<T, ValueError> {
        self.value.parse().map_err(|_| ValueError::InvalidNumber {
            key: self.key.clone(),
            value: self.value.clone(),
            expected,
        })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
