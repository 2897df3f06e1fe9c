//! Envelope type and helpers for HTTP responses.

use serde::Serialize;
use user_db_core::model::UserRow;

/// JSON body of every response.
///
/// `status` carries the outcome. Absent members are omitted, so a plain
/// success serializes as `{"status":200}`.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    /// Outcome code, independent of the HTTP status
    pub status: u16,
    /// Rows, each an array of column values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<UserRow<'a>>>,
    /// Id assigned by a create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    /// Human readable detail for failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<'a> Envelope<'a> {
    fn bare(status: u16) -> Self {
        Self {
            status,
            data: None,
            user_id: None,
            message: None,
        }
    }

    /// `{status:200}`
    pub fn ok() -> Self {
        Self::bare(200)
    }

    /// `{status:200, data:[...]}`
    pub fn rows(rows: Vec<UserRow<'a>>) -> Self {
        Self {
            data: Some(rows),
            ..Self::bare(200)
        }
    }

    /// `{status:201, user_id}`
    pub fn created(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::bare(201)
        }
    }

    /// `{status:404, message}`
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(404, message)
    }

    /// `{status, message}` for any failure code
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::bare(status)
        }
    }
}
