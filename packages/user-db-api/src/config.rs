//! API configuration.

/// HTTP layer configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Send the envelope status as the HTTP status instead of 200
    pub align_status_codes: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000, // 5 seconds default
            max_body_bytes: 64 * 1024,
            align_status_codes: false,
        }
    }
}
