//! Storage engine for the user record service.
//!
//! Provides the single `users` table, its record types, statement-level
//! durability through checksummed snapshots, and the error types shared
//! with the API layer.

pub mod config;
pub mod database;
pub mod error;
pub mod model;
pub mod persistence;
pub mod table;

pub use database::Database;
pub use error::DbError;
pub use model::{NewUser, User, UserChanges};
