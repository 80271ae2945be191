//! Entity model for contacts and meetings.
//!
//! # Responsibility
//! - Define the value types owned and handed out by the repository.
//! - Define identity, equality and chronological ordering helpers.
//!
//! # Invariants
//! - Contacts are identified by `ContactId`, meetings by `MeetingId`.
//! - Meetings reference attendees by contact id, never by private copies.

pub mod contact;
pub mod meeting;
