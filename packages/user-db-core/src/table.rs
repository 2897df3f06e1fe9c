//! In-memory representation of the `users` table.

use std::collections::BTreeMap;

use crate::error::DbError;
use crate::model::{NewUser, User, UserChanges, USERS_TABLE};

/// Rows keyed by id plus the id counter.
///
/// `next_id` is strictly greater than every id ever issued, so deleted ids
/// are never handed out again.
#[derive(Debug, Clone)]
pub struct UserTable {
    records: BTreeMap<u64, User>,
    next_id: u64,
}

impl UserTable {
    /// Creates an empty table whose first id is 1.
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a table from persisted rows.
    ///
    /// # Returns
    /// `DataCorruption` when ids repeat or `next_id` does not exceed the
    /// largest stored id.
    pub fn from_parts(rows: Vec<User>, next_id: u64) -> Result<Self, DbError> {
        let mut records = BTreeMap::new();
        for user in rows {
            let id = user.id;
            if id == 0 {
                return Err(DbError::DataCorruption(format!(
                    "Table '{}' contains reserved id 0",
                    USERS_TABLE
                )));
            }
            if records.insert(id, user).is_some() {
                return Err(DbError::DataCorruption(format!(
                    "Duplicate id {} in table '{}'",
                    id, USERS_TABLE
                )));
            }
        }
        if let Some(max_id) = records.keys().next_back() {
            if next_id <= *max_id {
                return Err(DbError::DataCorruption(format!(
                    "next_id {} does not exceed max id {} in table '{}'",
                    next_id, max_id, USERS_TABLE
                )));
            }
        }
        Ok(Self {
            records,
            next_id: next_id.max(1),
        })
    }

    /// Next id that `insert` will assign.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates rows in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.records.values()
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.records.get(&id)
    }

    /// Inserts a row and returns its id.
    pub fn insert(&mut self, new_user: NewUser) -> Result<u64, DbError> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or(DbError::IdSpaceExhausted { table: USERS_TABLE })?;
        self.records.insert(id, new_user.into_user(id));
        Ok(id)
    }

    /// Applies `changes` to row `id`. Returns false when the row is absent.
    pub fn update(&mut self, id: u64, changes: UserChanges) -> bool {
        match self.records.get_mut(&id) {
            Some(user) => {
                changes.apply_to(user);
                true
            }
            None => false,
        }
    }

    /// Removes row `id`. Returns false when the row is absent.
    pub fn remove(&mut self, id: u64) -> bool {
        self.records.remove(&id).is_some()
    }
}

impl Default for UserTable {
    fn default() -> Self {
        Self::new()
    }
}
