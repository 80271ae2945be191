//! Core domain logic for the contact book.
//! This crate is the single source of truth for contact/meeting invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{
    format_timestamp, parse_day, parse_timestamp, Clock, FixedClock, SystemClock, DAY_FORMAT,
    TIMESTAMP_FORMAT,
};
pub use config::{ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactId};
pub use model::meeting::{chronological, Meeting, MeetingId, MeetingKind};
pub use repo::contact_manager::ContactManager;
pub use repo::error::{ErrorKind, ManagerError, ManagerResult};
pub use service::contact_book::ContactBook;
pub use store::flat_file::FlatFileStore;
pub use store::{LoadOutcome, LoadStatus, Snapshot, SnapshotStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
