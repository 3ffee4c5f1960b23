//! Report document
//!
//! At most one report exists per (lesson, reporter email) pair. Reports are
//! never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: String,
    pub lesson_id: String,
    pub reporter_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(lesson_id: &str, reporter_email: &str, reason: Option<String>) -> Self {
        Self {
            id: new_id(),
            lesson_id: lesson_id.to_string(),
            reporter_email: reporter_email.to_string(),
            reason,
            created_at: Utc::now(),
        }
    }

    pub fn is_pair(&self, lesson_id: &str, reporter_email: &str) -> bool {
        self.lesson_id == lesson_id && self.reporter_email == reporter_email
    }
}
