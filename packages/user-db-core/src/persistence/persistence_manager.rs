//! Persistence manager for the table snapshot.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::config::DbConfig;
use crate::error::DbError;
use crate::table::UserTable;

use super::io_utils::{classify_io_error, retry_io_operation};
use super::snapshot::{self, SNAPSHOT_FILE};

/// Reads and writes the `users` snapshot in a data directory.
#[derive(Debug)]
pub struct PersistenceManager {
    /// Data directory path
    data_dir: PathBuf,
    /// Maximum retry attempts for transient I/O errors
    max_retries: u32,
    /// Delay between retry attempts in milliseconds
    retry_delay_ms: u64,
}

impl PersistenceManager {
    /// Creates a persistence manager for `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>, config: &DbConfig) -> Self {
        Self {
            data_dir: data_dir.into(),
            max_retries: config.persistence_max_retries,
            retry_delay_ms: config.persistence_retry_delay_ms,
        }
    }

    /// Returns the snapshot file path.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    /// Writes `table` to disk, replacing the previous snapshot atomically.
    ///
    /// # Arguments
    /// * `table` - Table state to persist
    ///
    /// # Returns
    /// `Result<(), DbError>` indicating success or failure.
    pub fn save(&self, table: &UserTable) -> Result<(), DbError> {
        let bytes = snapshot::encode(table)?;
        retry_io_operation(
            || self.save_internal(&bytes),
            self.max_retries,
            self.retry_delay_ms,
            "save_snapshot",
        )?;
        tracing::debug!(
            "Wrote snapshot {} ({} rows, {} bytes)",
            self.snapshot_path().display(),
            table.len(),
            bytes.len()
        );
        Ok(())
    }

    /// Internal implementation of save with retry logic.
    fn save_internal(&self, bytes: &[u8]) -> Result<(), DbError> {
        let temp_path = self.data_dir.join(format!("{}.tmp", SNAPSHOT_FILE));
        let final_path = self.snapshot_path();

        fs::create_dir_all(&self.data_dir)
            .map_err(|e| classify_io_error(e, "Failed to create data directory"))?;

        let mut file = File::create(&temp_path)
            .map_err(|e| classify_io_error(e, "Failed to create temp file"))?;
        file.write_all(bytes)
            .map_err(|e| classify_io_error(e, "Failed to write snapshot"))?;
        file.sync_all()
            .map_err(|e| classify_io_error(e, "Failed to sync snapshot"))?;

        // Atomic rename
        fs::rename(&temp_path, &final_path)
            .map_err(|e| classify_io_error(e, "Failed to rename snapshot file"))?;

        Ok(())
    }

    /// Loads the table from disk.
    ///
    /// # Returns
    /// An empty table when no snapshot exists yet, otherwise the verified
    /// table contents.
    pub fn load(&self) -> Result<UserTable, DbError> {
        let path = self.snapshot_path();
        if !path.exists() {
            tracing::info!(
                "No snapshot at {}, starting with an empty table",
                path.display()
            );
            return Ok(UserTable::new());
        }

        let bytes = retry_io_operation(
            || read_file(&path),
            self.max_retries,
            self.retry_delay_ms,
            "load_snapshot",
        )?;
        let table = snapshot::decode(&bytes)?;
        tracing::info!(
            "Loaded {} rows from {} (next id {})",
            table.len(),
            path.display(),
            table.next_id()
        );
        Ok(table)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, DbError> {
    let mut file =
        File::open(path).map_err(|e| classify_io_error(e, "Failed to open snapshot file"))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| classify_io_error(e, "Failed to read snapshot file"))?;
    Ok(contents)
}
