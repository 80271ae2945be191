//! In-memory contact/meeting repository.
//!
//! # Responsibility
//! - Own every contact and meeting and hand out their ids.
//! - Enforce referential and temporal invariants on every mutation/query.
//!
//! # Invariants
//! - Meeting ids come from one allocator shared by past and future meetings.
//! - Past/future classification is evaluated against the clock at call time.

pub mod contact_manager;
pub mod error;
pub mod id_allocator;
