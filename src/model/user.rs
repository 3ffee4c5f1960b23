//! User document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{new_id, strip_reserved};

/// Role assigned to every new user
pub const DEFAULT_ROLE: &str = "user";

const RESERVED: &[&str] = &["_id", "email", "createdAt", "isPremium", "role"];

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

/// User as stored and returned. Email is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    pub email: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub is_premium: bool,

    #[serde(default = "default_role")]
    pub role: String,

    /// Client-defined profile fields (name, photo, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Body of POST /users
#[derive(Debug, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl User {
    /// New non-premium user with the default role
    pub fn create(email: String, mut fields: Map<String, Value>) -> Self {
        strip_reserved(&mut fields, RESERVED);
        Self {
            id: new_id(),
            email,
            created_at: Utc::now(),
            is_premium: false,
            role: default_role(),
            fields,
        }
    }
}

/// Response of GET /users/:email/status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    pub is_premium: bool,
    pub role: String,
}

impl UserStatus {
    /// Status of a user, or the defaults when the user is unknown
    pub fn of(user: Option<&User>) -> Self {
        match user {
            Some(u) => Self {
                is_premium: u.is_premium,
                role: if u.role.is_empty() {
                    default_role()
                } else {
                    u.role.clone()
                },
            },
            None => Self {
                is_premium: false,
                role: default_role(),
            },
        }
    }
}
