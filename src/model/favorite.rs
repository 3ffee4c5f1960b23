//! Favorite document
//!
//! At most one favorite exists per (lesson, user email) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(rename = "_id")]
    pub id: String,
    pub lesson_id: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(lesson_id: &str, user_email: &str) -> Self {
        Self {
            id: new_id(),
            lesson_id: lesson_id.to_string(),
            user_email: user_email.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Whether this favorite is the (lesson, user) pair given
    pub fn is_pair(&self, lesson_id: &str, user_email: &str) -> bool {
        self.lesson_id == lesson_id && self.user_email == user_email
    }
}
