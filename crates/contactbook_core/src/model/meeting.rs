//! Meeting domain model.
//!
//! # Responsibility
//! - Represent scheduled (`Future`) and recorded (`Past`) meetings as one
//!   tagged type sharing id, date and attendee set.
//! - Classify meetings as past/future against a caller-supplied "now".
//!
//! # Invariants
//! - `id` is unique across both variants and never changes.
//! - `attendees` is non-empty and holds contact ids owned by the repository.
//! - The storage tag (`MeetingKind`) does not decide query-time
//!   classification; `date` compared with "now" does.
//! - A `Future` meeting becomes `Past` only through [`Meeting::into_past`],
//!   which is one-way.

use crate::model::contact::ContactId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Positive meeting identifier, unique across past and future meetings.
pub type MeetingId = u32;

/// Storage variant of a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MeetingKind {
    /// Scheduled meeting; carries no notes.
    Future,
    /// Concluded meeting with free-text notes (possibly empty).
    Past { notes: String },
}

/// A meeting with a date and a set of attending contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    id: MeetingId,
    date: NaiveDateTime,
    attendees: BTreeSet<ContactId>,
    kind: MeetingKind,
}

impl Meeting {
    /// Creates a scheduled meeting record.
    pub fn new_future(id: MeetingId, date: NaiveDateTime, attendees: BTreeSet<ContactId>) -> Self {
        Self {
            id,
            date,
            attendees,
            kind: MeetingKind::Future,
        }
    }

    /// Creates a concluded meeting record with notes.
    pub fn new_past(
        id: MeetingId,
        date: NaiveDateTime,
        attendees: BTreeSet<ContactId>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            attendees,
            kind: MeetingKind::Past {
                notes: notes.into(),
            },
        }
    }

    pub fn id(&self) -> MeetingId {
        self.id
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn attendees(&self) -> &BTreeSet<ContactId> {
        &self.attendees
    }

    pub fn kind(&self) -> &MeetingKind {
        &self.kind
    }

    pub fn has_attendee(&self, contact_id: ContactId) -> bool {
        self.attendees.contains(&contact_id)
    }

    /// Whether this record was stored as a concluded meeting.
    pub fn is_recorded_past(&self) -> bool {
        matches!(self.kind, MeetingKind::Past { .. })
    }

    /// Notes of a `Past` record; `None` for scheduled meetings.
    pub fn notes(&self) -> Option<&str> {
        match &self.kind {
            MeetingKind::Past { notes } => Some(notes.as_str()),
            MeetingKind::Future => None,
        }
    }

    /// True iff the meeting date is strictly after `now`.
    pub fn is_future_at(&self, now: NaiveDateTime) -> bool {
        self.date > now
    }

    /// True iff the meeting date is not after `now`.
    pub fn is_past_at(&self, now: NaiveDateTime) -> bool {
        !self.is_future_at(now)
    }

    /// True iff the meeting falls on `day`, ignoring time of day.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        self.date.date() == day
    }

    /// Converts this record into a `Past` record carrying `notes`.
    ///
    /// Id, date and attendees are preserved. Existing notes of a `Past`
    /// record are replaced, not appended.
    pub fn into_past(self, notes: impl Into<String>) -> Self {
        Self {
            kind: MeetingKind::Past {
                notes: notes.into(),
            },
            ..self
        }
    }
}

/// Orders meetings by date, then by id for a stable tie-break.
pub fn chronological(left: &Meeting, right: &Meeting) -> Ordering {
    left.date
        .cmp(&right.date)
        .then_with(|| left.id.cmp(&right.id))
}
