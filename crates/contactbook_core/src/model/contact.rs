//! Contact domain model.
//!
//! # Invariants
//! - `id` is assigned once by the repository and never changes.
//! - Two contacts are the same contact iff they share an `id`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Positive contact identifier, unique among contacts.
pub type ContactId = u32;

/// A person the user keeps notes about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    id: ContactId,
    name: String,
    notes: String,
}

impl Contact {
    /// Builds a contact with a repository-assigned id.
    pub fn new(id: ContactId, name: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            notes: notes.into(),
        }
    }

    pub fn id(&self) -> ContactId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text notes; empty when nothing was written.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Replaces the notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Appends a note on a new line. Empty existing notes are replaced.
    pub fn add_notes(&mut self, note: &str) {
        if self.notes.is_empty() {
            self.notes = note.to_string();
        } else {
            self.notes.push('\n');
            self.notes.push_str(note);
        }
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Contact {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Contact {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}
