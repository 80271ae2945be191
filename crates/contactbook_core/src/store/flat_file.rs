//! Flat delimited-text file store.
//!
//! # Responsibility
//! - Read and write the whole snapshot to one text file.
//! - Report malformed lines through logging without failing the load.
//!
//! # Invariants
//! - Saves replace the data file atomically (temp file + fsync + rename).
//! - A missing data file loads as `LoadOutcome::Missing`.

use crate::config::StoreConfig;
use crate::store::codec::LineCodec;
use crate::store::{LoadOutcome, Snapshot, SnapshotStore, StoreError, StoreResult};
use log::{error, info, warn};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const TEMP_SUFFIX: &str = ".tmp";

/// `SnapshotStore` backed by a single delimited text file.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
    codec: LineCodec,
}

impl FlatFileStore {
    /// Builds a store from a validated configuration.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            path: config.data_file.clone(),
            codec: LineCodec::from_config(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> io::Result<PathBuf> {
        let file_name = self.path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "data file path has no file name")
        })?;
        let mut temp_name = file_name.to_os_string();
        temp_name.push(TEMP_SUFFIX);
        Ok(self.path.with_file_name(temp_name))
    }

    fn write_atomically(&self, contents: &str) -> io::Result<()> {
        let temp_path = self.temp_path()?;
        let result = (|| {
            let mut file = File::create(&temp_path)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        })();
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

impl SnapshotStore for FlatFileStore {
    fn load(&self) -> StoreResult<LoadOutcome> {
        let started_at = Instant::now();
        info!("event=store_load module=store status=start");

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(
                    "event=store_load module=store status=skip reason=file_missing duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(LoadOutcome::Missing);
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(self.io_error(err));
            }
        };

        let report = self.codec.decode(&text);
        for skipped in &report.skipped {
            warn!(
                "event=store_line_skipped module=store status=skip line={} reason={}",
                skipped.line, skipped.reason
            );
        }
        info!(
            "event=store_load module=store status=ok duration_ms={} contacts={} meetings={} skipped_lines={}",
            started_at.elapsed().as_millis(),
            report.snapshot.contacts.len(),
            report.snapshot.meetings.len(),
            report.skipped.len()
        );
        Ok(LoadOutcome::Loaded(report.snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let started_at = Instant::now();
        info!("event=store_save module=store status=start");

        let contents = self.codec.encode(snapshot);
        match self.write_atomically(&contents) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok duration_ms={} contacts={} meetings={}",
                    started_at.elapsed().as_millis(),
                    snapshot.contacts.len(),
                    snapshot.meetings.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error_code=write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(self.io_error(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FlatFileStore;
    use crate::config::{ConfigError, StoreConfig};
    use crate::store::StoreError;

    #[test]
    fn new_rejects_invalid_config() {
        let config = StoreConfig {
            field_delimiter: ',',
            ..StoreConfig::default()
        };
        let err = FlatFileStore::new(&config).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Config(ConfigError::SameDelimiters(','))
        ));
    }

    #[test]
    fn temp_file_sits_next_to_data_file() {
        let store = FlatFileStore::new(&StoreConfig::with_data_file("/data/contacts.txt")).unwrap();
        assert_eq!(
            store.temp_path().unwrap(),
            std::path::PathBuf::from("/data/contacts.txt.tmp")
        );
    }
}
