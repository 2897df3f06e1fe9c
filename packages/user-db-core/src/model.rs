//! Record types for the `users` table.

use serde::{Deserialize, Serialize};

/// Table name used in logs and errors.
pub const USERS_TABLE: &str = "users";

/// A stored user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// Stored exactly as submitted.
    pub pwd: String,
    pub mobile: String,
}

/// Positional view of a row, serialized as `[id, name, email, pwd, mobile]`.
pub type UserRow<'a> = (u64, &'a str, &'a str, &'a str, &'a str);

impl User {
    /// Returns the row as a tuple of column values in storage order.
    pub fn as_row(&self) -> UserRow<'_> {
        (self.id, &self.name, &self.email, &self.pwd, &self.mobile)
    }
}

/// Values for a row about to be inserted. Empty strings are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub pwd: String,
    pub mobile: String,
}

impl NewUser {
    pub(crate) fn into_user(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            pwd: self.pwd,
            mobile: self.mobile,
        }
    }
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub pwd: Option<String>,
    pub mobile: Option<String>,
}

impl UserChanges {
    /// Returns true when no column is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.pwd.is_none() && self.mobile.is_none()
    }

    /// Writes every provided column into `user`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(pwd) = self.pwd {
            user.pwd = pwd;
        }
        if let Some(mobile) = self.mobile {
            user.mobile = mobile;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        NewUser {
            name: "Test User".to_string(),
            email: "testuser@example.com".to_string(),
            pwd: "password123".to_string(),
            mobile: "1234567890".to_string(),
        }
        .into_user(1)
    }

    #[test]
    fn test_row_serializes_as_array_in_column_order() {
        let user = sample();
        let json = serde_json::to_value(user.as_row()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([1, "Test User", "testuser@example.com", "password123", "1234567890"])
        );
    }

    #[test]
    fn test_apply_changes_only_touches_provided_columns() {
        let mut user = sample();
        let changes = UserChanges {
            email: Some("updated@example.com".to_string()),
            mobile: Some(String::new()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply_to(&mut user);

        assert_eq!(user.name, "Test User");
        assert_eq!(user.email, "updated@example.com");
        assert_eq!(user.pwd, "password123");
        assert_eq!(user.mobile, "");
    }

    #[test]
    fn test_empty_changes() {
        assert!(UserChanges::default().is_empty());
    }
}
