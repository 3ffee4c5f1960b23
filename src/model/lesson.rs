//! Lesson document
//!
//! Title, content and any other client fields are opaque and carried in
//! `fields`. Only the fields used for recommendations and the like/favorite
//! counters are typed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{new_id, strip_reserved};

/// Access level that makes a lesson eligible for recommendations
pub const ACCESS_PUBLIC: &str = "public";

/// Keys a client may not set when creating a lesson
const RESERVED: &[&str] = &[
    "_id",
    "createdAt",
    "likes",
    "likesCount",
    "favoritesCount",
    "recommended",
];

/// Lesson as stored and returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_tone: Option<String>,

    /// "public" or any other value (premium, private, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,

    pub created_at: DateTime<Utc>,

    /// User identifiers that liked this lesson (set semantics)
    #[serde(default)]
    pub likes: Vec<String>,

    /// Kept equal to `likes.len()`
    #[serde(default)]
    pub likes_count: i64,

    /// Kept equal to the number of favorites referencing this lesson
    #[serde(default)]
    pub favorites_count: i64,

    /// Client-defined fields (title, content, author, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Body of POST /lessons
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLesson {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub emotional_tone: Option<String>,
    #[serde(default)]
    pub access_level: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Lesson {
    /// Build a new lesson with zeroed counters and an empty liker set
    pub fn create(new: NewLesson) -> Self {
        let mut fields = new.fields;
        strip_reserved(&mut fields, RESERVED);

        Self {
            id: new_id(),
            category: new.category,
            emotional_tone: new.emotional_tone,
            access_level: new.access_level,
            created_at: Utc::now(),
            likes: Vec::new(),
            likes_count: 0,
            favorites_count: 0,
            fields,
        }
    }

    pub fn is_public(&self) -> bool {
        self.access_level.as_deref() == Some(ACCESS_PUBLIC)
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    /// Whether `other` may be recommended alongside this lesson:
    /// public, not this lesson, same category or same emotional tone.
    pub fn recommends(&self, other: &Lesson) -> bool {
        other.id != self.id
            && other.is_public()
            && (other.category == self.category || other.emotional_tone == self.emotional_tone)
    }
}

/// Lesson with its recommendations, as returned by GET /lessons/:id
#[derive(Debug, Clone, Serialize)]
pub struct LessonDetail {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub recommended: Vec<Lesson>,
}
