//! Persistence adapter boundary.
//!
//! # Responsibility
//! - Define the snapshot value exchanged between repository and storage.
//! - Define the `SnapshotStore` contract and its flat-file implementation.
//!
//! # Invariants
//! - Stores have no business logic; referential checks belong to the
//!   repository (`ContactManager::restore`).
//! - A missing backing file is reported as `LoadOutcome::Missing`, not as
//!   an error.

use crate::config::ConfigError;
use crate::model::contact::Contact;
use crate::model::meeting::Meeting;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod codec;
pub mod flat_file;

pub type StoreResult<T> = Result<T, StoreError>;

/// Full repository state handed to or received from a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub contacts: Vec<Contact>,
    pub meetings: Vec<Meeting>,
}

/// Result of reading a store.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Snapshot),
    /// Nothing persisted yet; callers start from an empty repository.
    Missing,
}

/// Summary reported to callers after a repository load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded { contacts: usize, meetings: usize },
    Missing,
}

/// Storage contract used by the repository on explicit save/load.
pub trait SnapshotStore {
    fn load(&self) -> StoreResult<LoadOutcome>;
    fn save(&self, snapshot: &Snapshot) -> StoreResult<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn load(&self) -> StoreResult<LoadOutcome> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }
}

/// Persistence error.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Persisted records are inconsistent with each other.
    Format(String),
    Config(ConfigError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Format(message) => write!(f, "invalid persisted data: {message}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Format(_) => None,
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}
