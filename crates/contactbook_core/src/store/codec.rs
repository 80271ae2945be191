//! Line codec for the flat data file.
//!
//! One record per line, fields separated by the field delimiter:
//!
//! ```text
//! CONTACT&id&name&notes
//! PASTMEETING&id&yyyy/MM/dd HH:mm:ss&notes&attendee,attendee
//! FUTUREMEETING&id&yyyy/MM/dd HH:mm:ss&attendee,attendee
//! ```
//!
//! # Invariants
//! - Free-text fields escape `\`, line breaks and the field delimiter with
//!   a backslash; unescaped legacy text still decodes.
//! - Decoding never fails: malformed lines are reported as skipped.

use crate::clock::{format_timestamp, parse_timestamp};
use crate::config::{StoreConfig, ESCAPE_CHAR};
use crate::model::contact::{Contact, ContactId};
use crate::model::meeting::{Meeting, MeetingKind};
use crate::store::Snapshot;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

pub const CONTACT_TAG: &str = "CONTACT";
pub const PAST_MEETING_TAG: &str = "PASTMEETING";
pub const FUTURE_MEETING_TAG: &str = "FUTUREMEETING";

const CONTACT_MIN_FIELDS: usize = 4;
const PAST_MEETING_MIN_FIELDS: usize = 5;
const FUTURE_MEETING_FIELDS: usize = 4;

/// Why a line was ignored while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TooFewFields { expected: usize, found: usize },
    TooManyFields { expected: usize, found: usize },
    UnknownKind(String),
    InvalidId(String),
    InvalidTimestamp(String),
    InvalidAttendee(String),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewFields { expected, found } => {
                write!(f, "expected at least {expected} fields, found {found}")
            }
            Self::TooManyFields { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Self::UnknownKind(kind) => write!(f, "unknown record kind `{kind}`"),
            Self::InvalidId(value) => write!(f, "invalid id `{value}`"),
            Self::InvalidTimestamp(value) => write!(f, "invalid timestamp `{value}`"),
            Self::InvalidAttendee(value) => write!(f, "invalid attendee list `{value}`"),
        }
    }
}

/// One ignored input line (1-based line number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: SkipReason,
}

/// Decoded records plus the lines that were ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    pub snapshot: Snapshot,
    pub skipped: Vec<SkippedLine>,
}

/// Encoder/decoder bound to one delimiter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCodec {
    field_delimiter: char,
    attendee_delimiter: char,
}

impl LineCodec {
    /// Caller is responsible for passing a validated delimiter pair.
    pub fn new(field_delimiter: char, attendee_delimiter: char) -> Self {
        Self {
            field_delimiter,
            attendee_delimiter,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.field_delimiter, config.attendee_delimiter)
    }

    /// Encodes contacts (by id) followed by meetings (by id), one per line.
    pub fn encode(&self, snapshot: &Snapshot) -> String {
        let mut contacts: Vec<&Contact> = snapshot.contacts.iter().collect();
        contacts.sort_by_key(|contact| contact.id());
        let mut meetings: Vec<&Meeting> = snapshot.meetings.iter().collect();
        meetings.sort_by_key(|meeting| meeting.id());

        let mut out = String::new();
        for contact in contacts {
            out.push_str(&self.encode_contact(contact));
            out.push('\n');
        }
        for meeting in meetings {
            out.push_str(&self.encode_meeting(meeting));
            out.push('\n');
        }
        out
    }

    pub fn encode_contact(&self, contact: &Contact) -> String {
        self.join(&[
            CONTACT_TAG.to_string(),
            contact.id().to_string(),
            self.escape(contact.name()),
            self.escape(contact.notes()),
        ])
    }

    pub fn encode_meeting(&self, meeting: &Meeting) -> String {
        let id = meeting.id().to_string();
        let date = format_timestamp(&meeting.date());
        let attendees = meeting
            .attendees()
            .iter()
            .map(ContactId::to_string)
            .collect::<Vec<_>>()
            .join(self.attendee_delimiter.to_string().as_str());

        match meeting.kind() {
            MeetingKind::Past { notes } => self.join(&[
                PAST_MEETING_TAG.to_string(),
                id,
                date,
                self.escape(notes),
                attendees,
            ]),
            MeetingKind::Future => {
                self.join(&[FUTURE_MEETING_TAG.to_string(), id, date, attendees])
            }
        }
    }

    /// Decodes every non-blank line; malformed lines land in `skipped`.
    pub fn decode(&self, text: &str) -> DecodeReport {
        let mut report = DecodeReport::default();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.decode_line(line) {
                Ok(Record::Contact(contact)) => report.snapshot.contacts.push(contact),
                Ok(Record::Meeting(meeting)) => report.snapshot.meetings.push(meeting),
                Err(reason) => report.skipped.push(SkippedLine {
                    line: index + 1,
                    reason,
                }),
            }
        }
        report
    }

    fn decode_line(&self, line: &str) -> Result<Record, SkipReason> {
        let fields = self.split_fields(line);
        match fields[0].as_str() {
            CONTACT_TAG => {
                require_min_fields(&fields, CONTACT_MIN_FIELDS)?;
                let id = parse_id(&fields[1])?;
                // Unescaped legacy notes may contain the delimiter.
                let notes = self.join(&fields[3..]);
                Ok(Record::Contact(Contact::new(id, fields[2].clone(), notes)))
            }
            PAST_MEETING_TAG => {
                require_min_fields(&fields, PAST_MEETING_MIN_FIELDS)?;
                let last = fields.len() - 1;
                let id = parse_id(&fields[1])?;
                let date = parse_date(&fields[2])?;
                let notes = self.join(&fields[3..last]);
                let attendees = self.parse_attendees(&fields[last])?;
                Ok(Record::Meeting(Meeting::new_past(id, date, attendees, notes)))
            }
            FUTURE_MEETING_TAG => {
                require_min_fields(&fields, FUTURE_MEETING_FIELDS)?;
                if fields.len() > FUTURE_MEETING_FIELDS {
                    return Err(SkipReason::TooManyFields {
                        expected: FUTURE_MEETING_FIELDS,
                        found: fields.len(),
                    });
                }
                let id = parse_id(&fields[1])?;
                let date = parse_date(&fields[2])?;
                let attendees = self.parse_attendees(&fields[3])?;
                Ok(Record::Meeting(Meeting::new_future(id, date, attendees)))
            }
            other => Err(SkipReason::UnknownKind(other.to_string())),
        }
    }

    fn parse_attendees(&self, field: &str) -> Result<BTreeSet<ContactId>, SkipReason> {
        let invalid = || SkipReason::InvalidAttendee(field.to_string());
        let mut attendees = BTreeSet::new();
        for token in field.split(self.attendee_delimiter) {
            let id = parse_positive(token).ok_or_else(invalid)?;
            attendees.insert(id);
        }
        Ok(attendees)
    }

    fn join(&self, fields: &[String]) -> String {
        fields.join(self.field_delimiter.to_string().as_str())
    }

    fn escape(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                ch if ch == ESCAPE_CHAR || ch == self.field_delimiter => {
                    out.push(ESCAPE_CHAR);
                    out.push(ch);
                }
                ch => out.push(ch),
            }
        }
        out
    }

    /// Splits on unescaped delimiters and resolves escapes. Never empty.
    fn split_fields(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut chars = line.chars();
        while let Some(ch) = chars.next() {
            if ch == ESCAPE_CHAR {
                match chars.next() {
                    Some('n') => current.push('\n'),
                    Some('r') => current.push('\r'),
                    Some(other) => current.push(other),
                    None => current.push(ESCAPE_CHAR),
                }
            } else if ch == self.field_delimiter {
                fields.push(std::mem::take(&mut current));
            } else {
                current.push(ch);
            }
        }
        fields.push(current);
        fields
    }
}

enum Record {
    Contact(Contact),
    Meeting(Meeting),
}

fn require_min_fields(fields: &[String], expected: usize) -> Result<(), SkipReason> {
    if fields.len() < expected {
        return Err(SkipReason::TooFewFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn parse_positive(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

fn parse_id(text: &str) -> Result<u32, SkipReason> {
    parse_positive(text).ok_or_else(|| SkipReason::InvalidId(text.to_string()))
}

fn parse_date(text: &str) -> Result<chrono::NaiveDateTime, SkipReason> {
    parse_timestamp(text).ok_or_else(|| SkipReason::InvalidTimestamp(text.to_string()))
}
