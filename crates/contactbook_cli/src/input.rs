//! Raw text to typed argument conversion.
//!
//! # Invariants
//! - Empty text means "not supplied" and maps to `None`.
//! - Id lists accept commas, semicolons and/or whitespace as separators.

use chrono::{NaiveDate, NaiveDateTime};
use contactbook_core::{parse_day, parse_timestamp};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ID_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,;]+").expect("valid id separator regex"));

/// Input that could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    InvalidId(String),
    InvalidTimestamp(String),
    InvalidDay(String),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(value) => write!(f, "`{value}` is not a valid id"),
            Self::InvalidTimestamp(value) => {
                write!(f, "`{value}` is not a date like 2013/09/01 14:30:00")
            }
            Self::InvalidDay(value) => write!(f, "`{value}` is not a day like 2013/09/01"),
        }
    }
}

impl Error for InputError {}

/// `None` for blank input, otherwise the input without its line ending.
pub fn optional_text(line: &str) -> Option<String> {
    let trimmed = line.trim_end_matches(['\n', '\r']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_id(text: &str) -> Result<u32, InputError> {
    let trimmed = text.trim();
    trimmed
        .parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| InputError::InvalidId(trimmed.to_string()))
}

/// Parses `1, 2 3` style lists; blank input yields an empty list.
pub fn parse_id_list(text: &str) -> Result<Vec<u32>, InputError> {
    ID_SEPARATOR_RE
        .split(text.trim())
        .filter(|token| !token.is_empty())
        .map(parse_id)
        .collect()
}

/// `Ok(None)` for blank input.
pub fn parse_optional_timestamp(text: &str) -> Result<Option<NaiveDateTime>, InputError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(text)
        .map(Some)
        .ok_or_else(|| InputError::InvalidTimestamp(text.trim().to_string()))
}

pub fn parse_required_timestamp(text: &str) -> Result<NaiveDateTime, InputError> {
    parse_timestamp(text).ok_or_else(|| InputError::InvalidTimestamp(text.trim().to_string()))
}

pub fn parse_required_day(text: &str) -> Result<NaiveDate, InputError> {
    parse_day(text).ok_or_else(|| InputError::InvalidDay(text.trim().to_string()))
}
