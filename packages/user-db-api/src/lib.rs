//! REST API server for the user record store.
//!
//! Provides the `/user` CRUD endpoints, the JSON envelope they answer
//! with, request routing and the hyper connection loop.

pub mod config;
pub mod handlers;
pub mod router;
pub mod server;
