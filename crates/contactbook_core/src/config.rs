//! Store configuration.
//!
//! # Responsibility
//! - Describe where the flat data file lives and which delimiters it uses.
//! - Reject delimiter choices that would make persisted records ambiguous.
//!
//! # Invariants
//! - Field and attendee delimiters are distinct.
//! - Both delimiters are ASCII punctuation outside `\`, `-`, `/` and `:`,
//!   so neither can occur inside a tag, an id, a timestamp or an escape.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "contacts.txt";
pub const DEFAULT_FIELD_DELIMITER: char = '&';
pub const DEFAULT_ATTENDEE_DELIMITER: char = ',';

/// Escape character used by the line codec for free-text fields.
pub(crate) const ESCAPE_CHAR: char = '\\';

/// Configuration for the flat-file persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Data file path; relative paths resolve against the working directory.
    pub data_file: PathBuf,
    /// Separates the fields of one record.
    pub field_delimiter: char,
    /// Separates attendee ids inside the attendee field.
    pub attendee_delimiter: char,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            field_delimiter: DEFAULT_FIELD_DELIMITER,
            attendee_delimiter: DEFAULT_ATTENDEE_DELIMITER,
        }
    }
}

impl StoreConfig {
    /// Default delimiters with a caller-chosen data file.
    pub fn with_data_file(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            ..Self::default()
        }
    }

    /// Validates delimiter and path choices.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataFile);
        }
        check_delimiter("field", self.field_delimiter)?;
        check_delimiter("attendee", self.attendee_delimiter)?;
        if self.field_delimiter == self.attendee_delimiter {
            return Err(ConfigError::SameDelimiters(self.field_delimiter));
        }
        Ok(())
    }
}

/// Invalid store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDataFile,
    SameDelimiters(char),
    ReservedDelimiter { role: &'static str, value: char },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataFile => write!(f, "data file path cannot be empty"),
            Self::SameDelimiters(value) => write!(
                f,
                "field and attendee delimiters must differ, both are `{}`",
                value.escape_default()
            ),
            Self::ReservedDelimiter { role, value } => write!(
                f,
                "{role} delimiter `{}` is reserved",
                value.escape_default()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Accepts ASCII punctuation the codec never writes unescaped.
///
/// Letters appear in record tags and escape sequences (`\n`), digits, `-`,
/// `/`, `:` and spaces appear in ids and timestamps.
fn check_delimiter(role: &'static str, value: char) -> Result<(), ConfigError> {
    let allowed =
        value.is_ascii_punctuation() && !matches!(value, ESCAPE_CHAR | '-' | '/' | ':');
    if !allowed {
        return Err(ConfigError::ReservedDelimiter { role, value });
    }
    Ok(())
}
