//! Contact book use-case service.
//!
//! # Responsibility
//! - Open a repository from its store, tolerating a missing data file.
//! - Flush the repository back to the store on request.
//!
//! # Invariants
//! - Flush is best-effort: failures are logged and reported as `false`.
//! - Service APIs never bypass repository validation.

use crate::clock::{Clock, SystemClock};
use crate::repo::contact_manager::ContactManager;
use crate::store::{LoadStatus, SnapshotStore, StoreResult};
use log::{error, warn};

/// A `ContactManager` bound to the store it was loaded from.
pub struct ContactBook<S: SnapshotStore, C: Clock = SystemClock> {
    manager: ContactManager<C>,
    store: S,
    load_status: LoadStatus,
}

impl<S: SnapshotStore> ContactBook<S, SystemClock> {
    /// Opens a book on the local system clock.
    pub fn open(store: S) -> StoreResult<Self> {
        Self::open_with_clock(store, SystemClock)
    }
}

impl<S: SnapshotStore, C: Clock> ContactBook<S, C> {
    /// Loads the store into a fresh repository.
    ///
    /// A missing data file yields an empty book with
    /// `LoadStatus::Missing`; read and consistency failures are returned.
    pub fn open_with_clock(store: S, clock: C) -> StoreResult<Self> {
        let mut manager = ContactManager::with_clock(clock);
        let load_status = manager.load(&store)?;
        if load_status == LoadStatus::Missing {
            warn!("event=book_open module=service status=ok source=empty");
        }
        Ok(Self {
            manager,
            store,
            load_status,
        })
    }

    /// How the initial load went.
    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    pub fn manager(&self) -> &ContactManager<C> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ContactManager<C> {
        &mut self.manager
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saves the full repository state; returns whether it succeeded.
    pub fn flush(&self) -> bool {
        match self.manager.save(&self.store) {
            Ok(()) => true,
            Err(err) => {
                error!("event=book_flush module=service status=error error={err}");
                false
            }
        }
    }
}
