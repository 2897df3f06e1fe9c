//! Snapshot persistence for the `users` table.


pub mod io_utils;
pub mod persistence_manager;
pub mod snapshot;

pub use persistence_manager::PersistenceManager;
pub use snapshot::{SnapshotFile, SNAPSHOT_FILE, SNAPSHOT_VERSION};
