//! Request utilities for HTTP endpoints.

use std::sync::Arc;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, CONTENT_TYPE};
use hyper::{Request, Response};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use tokio::time;

use user_db_core::{Database, DbError, NewUser, UserChanges};

use super::response::Envelope;
use crate::config::ApiConfig;
use crate::router::{AppState, RouterError};

/// Helper function to read a request body with timeout and size limit
pub async fn read_request_body_with_timeout<B>(
    body: B,
    config: &ApiConfig,
) -> Result<Bytes, RouterError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let timeout_duration = time::Duration::from_millis(config.request_timeout_ms);
    let limited = Limited::new(body, config.max_body_bytes);
    let collected = time::timeout(timeout_duration, limited.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                RouterError::PayloadTooLarge(config.max_body_bytes)
            } else {
                RouterError::InternalError(format!("Failed to read request body: {}", e))
            }
        })?;
    Ok(collected.to_bytes())
}

/// Runs a store statement on the blocking pool.
///
/// The store handle is held only for the duration of `statement`.
pub async fn run_statement<F, R>(state: &AppState, statement: F) -> Result<R, RouterError>
where
    F: FnOnce(&Database) -> Result<R, DbError> + Send + 'static,
    R: Send + 'static,
{
    let db = Arc::clone(&state.db);
    tokio::task::spawn_blocking(move || statement(&db))
        .await
        .map_err(|e| RouterError::InternalError(format!("Statement task failed: {}", e)))?
        .map_err(map_db_error_to_router_error)
}

/// Map DbError to appropriate RouterError
pub fn map_db_error_to_router_error(e: DbError) -> RouterError {
    tracing::error!("Store error: {}", e);
    RouterError::InternalError(format!("Store error: {}", e))
}

/// Parses the `{id}` path segment. Anything but ASCII digits fitting a u64
/// is treated as an unmatched route.
pub fn parse_user_id(raw: &str, path: &str) -> Result<u64, RouterError> {
    let not_found = || RouterError::NotFound(format!("No route found for {}", path));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_found());
    }
    raw.parse().map_err(|_| not_found())
}

/// Encoding of a request body, taken from `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Form,
    Json,
}

impl BodyFormat {
    /// Anything other than `application/json` is read as form data.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let is_json = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
            .unwrap_or(false);
        if is_json {
            BodyFormat::Json
        } else {
            BodyFormat::Form
        }
    }
}

/// Decodes one `application/x-www-form-urlencoded` component.
fn decode_form_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Splits form-encoded input into decoded key/value pairs.
///
/// A key without `=` gets an empty value. Empty segments are skipped.
pub fn parse_form_fields(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_form_component(key), decode_form_component(value))
        })
        .collect()
}

/// User columns submitted with a request. Unknown keys are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct UserForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub pwd: Option<String>,
    pub mobile: Option<String>,
}

impl UserForm {
    /// Builds a form from decoded pairs; later duplicates win.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => form.name = Some(value),
                "email" => form.email = Some(value),
                "pwd" => form.pwd = Some(value),
                "mobile" => form.mobile = Some(value),
                _ => {}
            }
        }
        form
    }

    /// Overlays `other` on top of `self`.
    pub fn merge(self, other: UserForm) -> Self {
        Self {
            name: other.name.or(self.name),
            email: other.email.or(self.email),
            pwd: other.pwd.or(self.pwd),
            mobile: other.mobile.or(self.mobile),
        }
    }

    /// Converts to an insert. Every column must be present; empty values
    /// are accepted.
    pub fn into_new_user(self) -> Result<NewUser, RouterError> {
        fn required(value: Option<String>, field: &str) -> Result<String, RouterError> {
            value.ok_or_else(|| RouterError::BadRequest(format!("Missing form field '{}'", field)))
        }
        Ok(NewUser {
            name: required(self.name, "name")?,
            email: required(self.email, "email")?,
            pwd: required(self.pwd, "pwd")?,
            mobile: required(self.mobile, "mobile")?,
        })
    }

    /// Converts to a partial update.
    pub fn into_changes(self) -> UserChanges {
        UserChanges {
            name: self.name,
            email: self.email,
            pwd: self.pwd,
            mobile: self.mobile,
        }
    }
}

/// Reads user columns from the query string and the body.
///
/// Body fields override query fields with the same key.
pub async fn read_user_form<B>(req: Request<B>, config: &ApiConfig) -> Result<UserForm, RouterError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let query_form = parts
        .uri
        .query()
        .map(|q| UserForm::from_pairs(parse_form_fields(q)))
        .unwrap_or_default();

    let body_bytes = read_request_body_with_timeout(body, config).await?;
    if body_bytes.is_empty() {
        return Ok(query_form);
    }

    let body_form = match BodyFormat::from_headers(&parts.headers) {
        BodyFormat::Json => serde_json::from_slice::<UserForm>(&body_bytes)
            .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))?,
        BodyFormat::Form => {
            let text = std::str::from_utf8(&body_bytes).map_err(|e| {
                RouterError::BadRequest(format!("Form body is not valid UTF-8: {}", e))
            })?;
            UserForm::from_pairs(parse_form_fields(text))
        }
    };
    Ok(query_form.merge(body_form))
}

/// Serializes `envelope` and picks the transport status.
///
/// The transport status is 200 unless `align_status_codes` is set.
pub fn envelope_response(
    envelope: &Envelope<'_>,
    config: &ApiConfig,
) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(envelope)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    let status = if config.align_status_codes {
        envelope.status
    } else {
        200
    };
    build_response(status, json)
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}
