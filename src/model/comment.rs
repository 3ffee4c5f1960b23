//! Comment document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Comment on a lesson. The lesson reference is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub lesson_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commenter_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commenter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /comments
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default)]
    pub lesson_id: Option<String>,
    #[serde(default)]
    pub commenter_email: Option<String>,
    #[serde(default)]
    pub commenter_name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Comment {
    /// Stamp a comment with a fresh id and the server time
    pub fn create(lesson_id: String, new: NewComment) -> Self {
        Self {
            id: new_id(),
            lesson_id,
            commenter_email: new.commenter_email,
            commenter_name: new.commenter_name,
            comment: new.comment,
            created_at: Utc::now(),
        }
    }
}
