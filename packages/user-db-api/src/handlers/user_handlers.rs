//! CRUD handlers for the `/user` resource.
//!
//! Every outcome of a well-formed request is reported in the envelope;
//! see [`envelope_response`] for the transport status.

use hyper::body::{Body, Bytes};
use hyper::{Request, Response};

use crate::router::{AppState, RouterError};
use user_db_core::model::UserRow;

use super::request_utils::{envelope_response, read_user_form, run_statement};
use super::response::Envelope;

fn user_not_found(id: u64) -> Envelope<'static> {
    Envelope::not_found(format!("User {} not found", id))
}

/// Creates a user.
///
/// # Endpoint
/// `POST /user`
///
/// # Request Body
/// Form fields `name`, `email`, `pwd`, `mobile`. All four are required;
/// empty values are stored as given.
///
/// # Response
/// ```json
/// { "status": 201, "user_id": 1 }
/// ```
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/user \
///   -d 'name=Test User&email=testuser@example.com&pwd=password123&mobile=1234567890'
/// ```
pub async fn create_user<B>(req: Request<B>, state: AppState) -> Result<Response<Bytes>, RouterError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let new_user = read_user_form(req, &state.config).await?.into_new_user()?;
    let id = run_statement(&state, move |db| db.insert(new_user)).await?;
    tracing::info!("Created user {}", id);
    envelope_response(&Envelope::created(id), &state.config)
}

/// Lists every user.
///
/// # Endpoint
/// `GET /user`
///
/// # Response
/// ```json
/// { "status": 200, "data": [[1, "Test User", "testuser@example.com", "password123", "1234567890"]] }
/// ```
pub async fn list_users(state: AppState) -> Result<Response<Bytes>, RouterError> {
    let users = run_statement(&state, |db| db.select_all()).await?;
    let rows: Vec<UserRow<'_>> = users.iter().map(|u| u.as_row()).collect();
    envelope_response(&Envelope::rows(rows), &state.config)
}

/// Fetches one user.
///
/// # Endpoint
/// `GET /user/{id}`
///
/// # Response
/// - `{ "status": 200, "data": [[...]] }` with exactly one row
/// - `{ "status": 404, "message": "User 999 not found" }`
pub async fn get_user(id: u64, state: AppState) -> Result<Response<Bytes>, RouterError> {
    let user = run_statement(&state, move |db| db.select_by_id(id)).await?;
    let envelope = match &user {
        Some(user) => Envelope::rows(vec![user.as_row()]),
        None => user_not_found(id),
    };
    envelope_response(&envelope, &state.config)
}

/// Updates the provided columns of one user.
///
/// # Endpoint
/// `PUT /user/{id}`
///
/// # Request Body
/// Any subset of `name`, `email`, `pwd`, `mobile`. Omitted columns keep
/// their stored value.
///
/// # Response
/// - `{ "status": 200 }`
/// - `{ "status": 404, "message": "User 999 not found" }`; nothing is changed
///
/// # Example
/// ```bash
/// curl -X PUT http://localhost:8080/user/1 -d 'name=Updated User'
/// ```
pub async fn update_user<B>(
    req: Request<B>,
    id: u64,
    state: AppState,
) -> Result<Response<Bytes>, RouterError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let changes = read_user_form(req, &state.config).await?.into_changes();
    let updated = run_statement(&state, move |db| db.update_by_id(id, changes)).await?;
    let envelope = if updated {
        tracing::info!("Updated user {}", id);
        Envelope::ok()
    } else {
        user_not_found(id)
    };
    envelope_response(&envelope, &state.config)
}

/// Deletes one user.
///
/// # Endpoint
/// `DELETE /user/{id}`
///
/// # Response
/// - `{ "status": 200 }`
/// - `{ "status": 404, "message": "User 999 not found" }`, also for an id
///   that was already deleted
pub async fn delete_user(id: u64, state: AppState) -> Result<Response<Bytes>, RouterError> {
    let deleted = run_statement(&state, move |db| db.delete_by_id(id)).await?;
    let envelope = if deleted {
        tracing::info!("Deleted user {}", id);
        Envelope::ok()
    } else {
        user_not_found(id)
    };
    envelope_response(&envelope, &state.config)
}
