//! Contact and meeting repository.
//!
//! # Responsibility
//! - Own the canonical contact and meeting collections.
//! - Validate attendees, dates and required arguments before mutating.
//! - Answer id/contact/date queries with chronologically sorted results.
//! - Convert a scheduled meeting into a recorded one when notes arrive.
//!
//! # Invariants
//! - Every meeting attendee id resolves to a stored contact.
//! - Meeting ids are drawn from one allocator for both variants.
//! - `get_past_*`/`get_future_*` classify by `date` vs `clock.now()`, never
//!   by the stored `MeetingKind`.
//! - Failed operations leave state untouched.

use crate::clock::{Clock, SystemClock};
use crate::model::contact::{Contact, ContactId};
use crate::model::meeting::{chronological, Meeting, MeetingId};
use crate::repo::error::{ManagerError, ManagerResult};
use crate::repo::id_allocator::IdAllocator;
use crate::store::{LoadOutcome, LoadStatus, Snapshot, SnapshotStore, StoreError, StoreResult};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};

/// In-memory repository of contacts and meetings.
#[derive(Debug)]
pub struct ContactManager<C: Clock = SystemClock> {
    clock: C,
    contacts: HashMap<ContactId, Contact>,
    meetings: HashMap<MeetingId, Meeting>,
    contact_ids: IdAllocator,
    meeting_ids: IdAllocator,
}

impl ContactManager<SystemClock> {
    /// Empty repository on the local system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ContactManager<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ContactManager<C> {
    /// Empty repository using `clock` for every past/future decision.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            contacts: HashMap::new(),
            meetings: HashMap::new(),
            contact_ids: IdAllocator::new(),
            meeting_ids: IdAllocator::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Creates a contact and returns its id.
    ///
    /// `None` stands for an input that was not supplied. An empty name is
    /// accepted.
    pub fn add_contact(
        &mut self,
        name: Option<&str>,
        notes: Option<&str>,
    ) -> ManagerResult<ContactId> {
        let name = name.ok_or(ManagerError::MissingArgument("name"))?;
        let notes = notes.ok_or(ManagerError::MissingArgument("notes"))?;
        let id = self
            .contact_ids
            .allocate()
            .ok_or(ManagerError::IdSpaceExhausted("contact"))?;

        self.contacts.insert(id, Contact::new(id, name, notes));
        debug!("event=contact_add module=manager status=ok contact_id={id}");
        Ok(id)
    }

    /// Schedules a meeting strictly after now.
    ///
    /// The date is checked before the attendees, so a past date is always
    /// reported as `DateNotInFuture`.
    pub fn add_future_meeting(
        &mut self,
        attendees: &[ContactId],
        date: NaiveDateTime,
    ) -> ManagerResult<MeetingId> {
        if date <= self.clock.now() {
            return Err(ManagerError::DateNotInFuture(date));
        }
        let attendees = self.resolve_attendees(attendees)?;
        let id = self.allocate_meeting_id()?;

        self.meetings
            .insert(id, Meeting::new_future(id, date, attendees));
        debug!("event=meeting_add module=manager status=ok kind=future meeting_id={id}");
        Ok(id)
    }

    /// Records a concluded meeting.
    ///
    /// The date is not required to be in the past: a record dated after now
    /// is stored, but will be classified as future by the query operations
    /// until its date passes.
    pub fn add_new_past_meeting(
        &mut self,
        attendees: Option<&[ContactId]>,
        date: Option<NaiveDateTime>,
        notes: Option<&str>,
    ) -> ManagerResult<MeetingId> {
        let attendees = attendees.ok_or(ManagerError::MissingArgument("attendees"))?;
        let date = date.ok_or(ManagerError::MissingArgument("date"))?;
        let notes = notes.ok_or(ManagerError::MissingArgument("notes"))?;
        let attendees = self.resolve_attendees(attendees)?;
        let id = self.allocate_meeting_id()?;

        self.meetings
            .insert(id, Meeting::new_past(id, date, attendees, notes));
        debug!("event=meeting_add module=manager status=ok kind=past meeting_id={id}");
        Ok(id)
    }

    /// Looks up a meeting regardless of its past/future status.
    pub fn get_meeting(&self, id: MeetingId) -> Option<&Meeting> {
        self.meetings.get(&id)
    }

    /// Returns the meeting if it is dated after now.
    ///
    /// `Ok(None)` when no meeting has this id; `MeetingInPast` when one does
    /// but its date is not after now.
    pub fn get_future_meeting(&self, id: MeetingId) -> ManagerResult<Option<&Meeting>> {
        let Some(meeting) = self.meetings.get(&id) else {
            return Ok(None);
        };
        if meeting.is_past_at(self.clock.now()) {
            return Err(ManagerError::MeetingInPast(id));
        }
        Ok(Some(meeting))
    }

    /// Returns the meeting if it is dated at or before now.
    ///
    /// `Ok(None)` when no meeting has this id; `MeetingInFuture` when one
    /// does but its date is after now.
    pub fn get_past_meeting(&self, id: MeetingId) -> ManagerResult<Option<&Meeting>> {
        let Some(meeting) = self.meetings.get(&id) else {
            return Ok(None);
        };
        if meeting.is_future_at(self.clock.now()) {
            return Err(ManagerError::MeetingInFuture(id));
        }
        Ok(Some(meeting))
    }

    /// Meetings dated after now that `contact_id` attends, oldest first.
    pub fn get_future_meetings_for_contact(
        &self,
        contact_id: ContactId,
    ) -> ManagerResult<Vec<&Meeting>> {
        self.require_contact(contact_id)?;
        let now = self.clock.now();
        Ok(self.sorted_meetings(|meeting| {
            meeting.has_attendee(contact_id) && meeting.is_future_at(now)
        }))
    }

    /// Meetings dated at or before now that `contact_id` attended, oldest first.
    pub fn get_past_meetings_for_contact(
        &self,
        contact_id: ContactId,
    ) -> ManagerResult<Vec<&Meeting>> {
        self.require_contact(contact_id)?;
        let now = self.clock.now();
        Ok(self.sorted_meetings(|meeting| {
            meeting.has_attendee(contact_id) && meeting.is_past_at(now)
        }))
    }

    /// Past and future meetings on the calendar day `day`, oldest first.
    pub fn get_meetings_on_date(&self, day: NaiveDate) -> Vec<&Meeting> {
        self.sorted_meetings(|meeting| meeting.occurs_on(day))
    }

    /// Attaches notes to a meeting that has happened.
    ///
    /// A scheduled record is replaced by a recorded one with the same id,
    /// date and attendees. A recorded meeting has its notes overwritten.
    pub fn add_meeting_notes(&mut self, id: MeetingId, text: Option<&str>) -> ManagerResult<()> {
        let meeting = self
            .meetings
            .get(&id)
            .ok_or(ManagerError::UnknownMeeting(id))?;
        if meeting.is_future_at(self.clock.now()) {
            return Err(ManagerError::NotesOnFutureMeeting(id));
        }
        let text = text.ok_or(ManagerError::MissingArgument("text"))?;

        let Some(meeting) = self.meetings.remove(&id) else {
            return Err(ManagerError::UnknownMeeting(id));
        };
        let converted = !meeting.is_recorded_past();
        self.meetings.insert(id, meeting.into_past(text));
        debug!(
            "event=meeting_notes module=manager status=ok meeting_id={id} converted={converted}"
        );
        Ok(())
    }

    /// Contacts for every id in `ids`, deduplicated and sorted by id.
    pub fn find_contacts_by_ids(&self, ids: &[ContactId]) -> ManagerResult<Vec<&Contact>> {
        let mut found = BTreeSet::new();
        for id in ids {
            let contact = self
                .contacts
                .get(id)
                .ok_or(ManagerError::UnknownContact(*id))?;
            found.insert(contact);
        }
        Ok(found.into_iter().collect())
    }

    /// Contacts whose name contains `needle` (case-sensitive), sorted by id.
    pub fn find_contacts_by_name(&self, needle: Option<&str>) -> ManagerResult<Vec<&Contact>> {
        let needle = needle.ok_or(ManagerError::MissingArgument("name"))?;
        let mut found: Vec<&Contact> = self
            .contacts
            .values()
            .filter(|contact| contact.name().contains(needle))
            .collect();
        found.sort();
        Ok(found)
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.get(&id)
    }

    /// All contacts sorted by id.
    pub fn contacts(&self) -> Vec<&Contact> {
        let mut all: Vec<&Contact> = self.contacts.values().collect();
        all.sort();
        all
    }

    /// All meetings, oldest first.
    pub fn meetings(&self) -> Vec<&Meeting> {
        self.sorted_meetings(|_| true)
    }

    /// Replaces a contact's notes.
    pub fn set_contact_notes(&mut self, id: ContactId, notes: Option<&str>) -> ManagerResult<()> {
        let notes = notes.ok_or(ManagerError::MissingArgument("notes"))?;
        let contact = self
            .contacts
            .get_mut(&id)
            .ok_or(ManagerError::UnknownContact(id))?;
        contact.set_notes(notes);
        debug!("event=contact_notes module=manager status=ok mode=set contact_id={id}");
        Ok(())
    }

    /// Appends a line to a contact's notes.
    pub fn add_contact_notes(&mut self, id: ContactId, note: Option<&str>) -> ManagerResult<()> {
        let note = note.ok_or(ManagerError::MissingArgument("notes"))?;
        let contact = self
            .contacts
            .get_mut(&id)
            .ok_or(ManagerError::UnknownContact(id))?;
        contact.add_notes(note);
        debug!("event=contact_notes module=manager status=ok mode=append contact_id={id}");
        Ok(())
    }

    /// Copies the full state for persistence.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            contacts: self.contacts().into_iter().cloned().collect(),
            meetings: self.meetings().into_iter().cloned().collect(),
        }
    }

    /// Replaces the full state with `snapshot`.
    ///
    /// Contacts are inserted before meetings, so record order inside the
    /// snapshot is irrelevant. Duplicate ids, meetings without attendees and
    /// attendee ids without a contact are rejected, and the current state is
    /// kept on rejection. Both id allocators resume after the largest
    /// restored id.
    pub fn restore(&mut self, snapshot: Snapshot) -> StoreResult<()> {
        let mut contacts = HashMap::with_capacity(snapshot.contacts.len());
        let mut contact_ids = IdAllocator::new();
        for contact in snapshot.contacts {
            let id = contact.id();
            if contacts.insert(id, contact).is_some() {
                return Err(StoreError::Format(format!("duplicate contact id {id}")));
            }
            contact_ids.observe(id);
        }

        let mut meetings = HashMap::with_capacity(snapshot.meetings.len());
        let mut meeting_ids = IdAllocator::new();
        for meeting in snapshot.meetings {
            let id = meeting.id();
            if meeting.attendees().is_empty() {
                return Err(StoreError::Format(format!("meeting {id} has no attendees")));
            }
            if let Some(missing) = meeting
                .attendees()
                .iter()
                .find(|attendee| !contacts.contains_key(*attendee))
            {
                return Err(StoreError::Format(format!(
                    "meeting {id} references unknown contact {missing}"
                )));
            }
            if meetings.insert(id, meeting).is_some() {
                return Err(StoreError::Format(format!("duplicate meeting id {id}")));
            }
            meeting_ids.observe(id);
        }

        self.contacts = contacts;
        self.meetings = meetings;
        self.contact_ids = contact_ids;
        self.meeting_ids = meeting_ids;
        Ok(())
    }

    /// Writes the full state to `store`.
    pub fn save<S: SnapshotStore>(&self, store: &S) -> StoreResult<()> {
        store.save(&self.snapshot())
    }

    /// Replaces the full state with what `store` holds.
    ///
    /// A store with nothing persisted yields an empty repository.
    pub fn load<S: SnapshotStore>(&mut self, store: &S) -> StoreResult<LoadStatus> {
        match store.load()? {
            LoadOutcome::Loaded(snapshot) => {
                self.restore(snapshot)?;
                let status = LoadStatus::Loaded {
                    contacts: self.contacts.len(),
                    meetings: self.meetings.len(),
                };
                info!(
                    "event=manager_load module=manager status=ok contacts={} meetings={}",
                    self.contacts.len(),
                    self.meetings.len()
                );
                Ok(status)
            }
            LoadOutcome::Missing => {
                self.restore(Snapshot::default())?;
                info!("event=manager_load module=manager status=ok source=empty");
                Ok(LoadStatus::Missing)
            }
        }
    }

    fn require_contact(&self, id: ContactId) -> ManagerResult<()> {
        if !self.contacts.contains_key(&id) {
            return Err(ManagerError::UnknownContact(id));
        }
        Ok(())
    }

    fn resolve_attendees(&self, ids: &[ContactId]) -> ManagerResult<BTreeSet<ContactId>> {
        if ids.is_empty() {
            return Err(ManagerError::EmptyAttendees);
        }
        for id in ids {
            self.require_contact(*id)?;
        }
        Ok(ids.iter().copied().collect())
    }

    fn allocate_meeting_id(&mut self) -> ManagerResult<MeetingId> {
        self.meeting_ids
            .allocate()
            .ok_or(ManagerError::IdSpaceExhausted("meeting"))
    }

    fn sorted_meetings(&self, keep: impl Fn(&Meeting) -> bool) -> Vec<&Meeting> {
        let mut selected: Vec<&Meeting> = self
            .meetings
            .values()
            .filter(|meeting| keep(meeting))
            .collect();
        selected.sort_by(|left, right| chronological(left, right));
        selected
    }
}
