use std::fmt;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// A registered member. The password hash never leaves the store layer inside this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password_hash", &"********")
            .field("name", &self.name)
            .finish()
    }
}

/// User row together with its stored PHC hash, used only for login.
#[derive(Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Identity resolved from a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl AuthUser {
    /// Identifier stored in `bookings.user_id` for this user.
    pub fn subject(&self) -> String {
        self.id.to_string()
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}
