//! Repository error model.

use crate::model::contact::ContactId;
use crate::model::meeting::MeetingId;
use crate::clock::format_timestamp;
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Coarse error categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown id, violated temporal precondition, or empty attendee set.
    InvalidArgument,
    /// Operation not allowed in the target's current state.
    InvalidState,
    /// A required argument was not supplied.
    NullReference,
}

/// Precondition violation reported by `ContactManager`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    MissingArgument(&'static str),
    UnknownContact(ContactId),
    UnknownMeeting(MeetingId),
    DateNotInFuture(NaiveDateTime),
    EmptyAttendees,
    /// Requested as past, but dated after now.
    MeetingInFuture(MeetingId),
    /// Requested as future, but dated at or before now.
    MeetingInPast(MeetingId),
    NotesOnFutureMeeting(MeetingId),
    IdSpaceExhausted(&'static str),
}

impl ManagerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArgument(_) => ErrorKind::NullReference,
            Self::NotesOnFutureMeeting(_) | Self::IdSpaceExhausted(_) => ErrorKind::InvalidState,
            Self::UnknownContact(_)
            | Self::UnknownMeeting(_)
            | Self::DateNotInFuture(_)
            | Self::EmptyAttendees
            | Self::MeetingInFuture(_)
            | Self::MeetingInPast(_) => ErrorKind::InvalidArgument,
        }
    }
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingArgument(name) => write!(f, "required argument `{name}` is missing"),
            Self::UnknownContact(id) => write!(f, "contact not found: {id}"),
            Self::UnknownMeeting(id) => write!(f, "meeting not found: {id}"),
            Self::DateNotInFuture(date) => {
                write!(f, "meeting date {} is not in the future", format_timestamp(date))
            }
            Self::EmptyAttendees => write!(f, "a meeting needs at least one attendee"),
            Self::MeetingInFuture(id) => write!(f, "meeting {id} is in the future"),
            Self::MeetingInPast(id) => write!(f, "meeting {id} is in the past"),
            Self::NotesOnFutureMeeting(id) => {
                write!(f, "cannot add notes to meeting {id}: it has not happened yet")
            }
            Self::IdSpaceExhausted(scope) => write!(f, "no {scope} ids left to allocate"),
        }
    }
}

impl Error for ManagerError {}
