//! Domain documents exchanged over the HTTP API
//!
//! Identifiers are 24-character hex ObjectIds generated here, so every
//! store backend persists the same `_id` the client later sees.

mod comment;
mod favorite;
mod lesson;
mod report;
mod user;

pub use comment::{Comment, NewComment};
pub use favorite::Favorite;
pub use lesson::{Lesson, LessonDetail, NewLesson, ACCESS_PUBLIC};
pub use report::Report;
pub use user::{NewUser, User, UserStatus, DEFAULT_ROLE};

use serde_json::{Map, Value};

/// Generate a new document identifier
pub fn new_id() -> String {
    bson::oid::ObjectId::new().to_hex()
}

/// Remove server-managed keys from client-supplied free-form fields
pub(crate) fn strip_reserved(fields: &mut Map<String, Value>, reserved: &[&str]) {
    for key in reserved {
        fields.remove(*key);
    }
}
