//! Database container for the `users` table.

use std::sync::RwLock;

use crate::config::DbConfig;
use crate::error::DbError;
use crate::model::{NewUser, User, UserChanges, USERS_TABLE};
use crate::persistence::PersistenceManager;
use crate::table::UserTable;

/// Handle to the user store.
///
/// Every operation is a single auto-committed statement. Reads share the
/// table lock; writes hold it exclusively until the statement (and, for a
/// backed store, its snapshot write) completes.
#[derive(Debug)]
pub struct Database {
    /// Committed table state
    table: RwLock<UserTable>,
    /// Snapshot writer, absent for in-memory stores
    persistence: Option<PersistenceManager>,
}

impl Database {
    /// Creates a new empty in-memory database.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(UserTable::new()),
            persistence: None,
        }
    }

    /// Opens a database according to `config`.
    ///
    /// With a data directory the existing snapshot is loaded and verified;
    /// without one this is equivalent to [`Database::new`].
    ///
    /// # Returns
    /// `DataCorruption` if the snapshot fails verification.
    pub fn open(config: &DbConfig) -> Result<Self, DbError> {
        let Some(data_dir) = &config.data_dir else {
            return Ok(Self::new());
        };
        let persistence = PersistenceManager::new(data_dir, config);
        let table = persistence.load()?;
        Ok(Self {
            table: RwLock::new(table),
            persistence: Some(persistence),
        })
    }

    /// Returns true when statements are written to a snapshot.
    pub fn is_persistent(&self) -> bool {
        self.persistence.is_some()
    }

    /// Inserts a user and returns the assigned id.
    pub fn insert(&self, new_user: NewUser) -> Result<u64, DbError> {
        let id = self.execute(|table| table.insert(new_user).map(|id| (id, true)))?;
        tracing::debug!("Inserted row {} into '{}'", id, USERS_TABLE);
        Ok(id)
    }

    /// Returns every user in ascending id order.
    pub fn select_all(&self) -> Result<Vec<User>, DbError> {
        let table = self.table.read().map_err(|_| DbError::LockPoisoned)?;
        Ok(table.iter().cloned().collect())
    }

    /// Returns the user with `id`, if any.
    pub fn select_by_id(&self, id: u64) -> Result<Option<User>, DbError> {
        let table = self.table.read().map_err(|_| DbError::LockPoisoned)?;
        Ok(table.get(id).cloned())
    }

    /// Applies `changes` to user `id`.
    ///
    /// # Returns
    /// `false` if no such user exists; nothing is written in that case.
    /// An empty change set on an existing user reports `true` without
    /// rewriting the snapshot.
    pub fn update_by_id(&self, id: u64, changes: UserChanges) -> Result<bool, DbError> {
        let empty = changes.is_empty();
        let updated = self.execute(|table| {
            let updated = table.update(id, changes);
            Ok((updated, updated && !empty))
        })?;
        tracing::debug!("Update of row {} in '{}': found={}", id, USERS_TABLE, updated);
        Ok(updated)
    }

    /// Deletes user `id`.
    ///
    /// # Returns
    /// `false` if no such user exists.
    pub fn delete_by_id(&self, id: u64) -> Result<bool, DbError> {
        let deleted = self.execute(|table| {
            let deleted = table.remove(id);
            Ok((deleted, deleted))
        })?;
        tracing::debug!("Delete of row {} in '{}': found={}", id, USERS_TABLE, deleted);
        Ok(deleted)
    }

    /// Returns the number of stored users.
    pub fn count(&self) -> Result<usize, DbError> {
        let table = self.table.read().map_err(|_| DbError::LockPoisoned)?;
        Ok(table.len())
    }

    /// Runs one mutating statement under the write lock.
    ///
    /// `statement` returns its result and whether it changed the table. For a
    /// backed store the statement runs against a staged copy which replaces
    /// the committed table only after the snapshot write succeeds.
    fn execute<F, R>(&self, statement: F) -> Result<R, DbError>
    where
        F: FnOnce(&mut UserTable) -> Result<(R, bool), DbError>,
    {
        let mut table = self.table.write().map_err(|_| DbError::LockPoisoned)?;

        let Some(persistence) = &self.persistence else {
            return statement(&mut *table).map(|(result, _)| result);
        };

        let mut staged = table.clone();
        let (result, changed) = statement(&mut staged)?;
        if changed {
            if let Err(e) = persistence.save(&staged) {
                tracing::error!("Failed to persist '{}': {}", USERS_TABLE, e);
                return Err(e);
            }
            *table = staged;
        }
        Ok(result)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
