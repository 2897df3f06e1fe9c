//! Shared fixtures.

use user_db_core::NewUser;

/// Returns a fully populated user named `name`.
pub fn sample_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', "")),
        pwd: "password123".to_string(),
        mobile: "1234567890".to_string(),
    }
}
