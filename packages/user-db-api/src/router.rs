//! Matchit routing configuration.

use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use matchit::Router as MatchitRouter;

use crate::config::ApiConfig;
use crate::handlers;
use crate::handlers::request_utils::parse_user_id;
use crate::handlers::Envelope;
use user_db_core::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Store handle
    pub db: Arc<Database>,
    /// API configuration
    pub config: Arc<ApiConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the `/user` routes.
    pub fn new(db: Arc<Database>, config: Arc<ApiConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/user", RouteHandler::Users)
            .expect("Failed to insert /user route");
        router
            .insert("/user/{id}", RouteHandler::User)
            .expect("Failed to insert /user/{id} route");

        Self {
            inner: router,
            state: AppState { db, config },
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an
    /// error that has not been rendered yet.
    pub async fn route<B>(&self, req: Request<B>) -> Result<Response<Bytes>, RouterError>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let path = req.uri().path().to_string();
        tracing::debug!("{} {}", req.method(), path);

        let (handler, id) = match self.inner.at(&path) {
            Ok(matched) => (*matched.value, matched.params.get("id").map(str::to_string)),
            Err(_) => return Err(RouterError::NotFound(format!("No route found for {}", path))),
        };

        let method = req.method().clone();
        match handler {
            RouteHandler::Users => match method {
                Method::POST => handlers::create_user(req, self.state.clone()).await,
                Method::GET => handlers::list_users(self.state.clone()).await,
                _ => Err(RouterError::MethodNotAllowed),
            },
            RouteHandler::User => {
                let id = parse_user_id(id.as_deref().unwrap_or_default(), &path)?;
                match method {
                    Method::GET => handlers::get_user(id, self.state.clone()).await,
                    Method::PUT => handlers::update_user(req, id, self.state.clone()).await,
                    Method::DELETE => handlers::delete_user(id, self.state.clone()).await,
                    _ => Err(RouterError::MethodNotAllowed),
                }
            }
        }
    }

    /// Routes a request and renders any error into a response.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Bytes>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        match self.route(req).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("{} {} failed: {}", method, path, err);
                err.into()
            }
        }
    }
}

/// Route handler function.
#[derive(Debug, Clone, Copy)]
enum RouteHandler {
    Users,
    User,
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
    PayloadTooLarge(usize),
}

impl RouterError {
    /// HTTP status used for this error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
            RouterError::PayloadTooLarge(_) => 413,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::PayloadTooLarge(limit) => {
                write!(f, "Payload Too Large: body exceeds {} bytes", limit)
            }
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let envelope = Envelope::error(status, err.to_string());
        let body = serde_json::to_vec(&envelope).unwrap_or_else(|_| {
            format!("{{\"status\":{}}}", status).into_bytes()
        });

        Response::builder()
            .status(status)
            .header(hyper::header::CONTENT_TYPE, "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                let mut fallback = Response::new(Bytes::from_static(b"{\"status\":500}"));
                *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}
