//! Integration test suite for the user store.
//!
//! 1. Basic CRUD through the public `Database` API
//! 2. Persistence across reopen
//! 3. Concurrent access from several threads

pub mod basic_crud;
pub mod concurrency_tests;
pub mod helpers;
pub mod persistence_tests;
