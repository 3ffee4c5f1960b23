//! Lesson document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use super::{document_to_fields, fields_to_document, parse_object_id};
use crate::db::mongo::IntoIndexes;
use crate::model::Lesson;
use crate::types::ApiError;

/// Collection name for lessons
pub const LESSON_COLLECTION: &str = "lessons";

/// Lesson document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LessonDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_tone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,

    pub created_at: DateTime,

    /// Liker identifiers, maintained with $addToSet/$pull
    #[serde(default)]
    pub likes: Vec<String>,

    #[serde(default)]
    pub likes_count: i64,

    #[serde(default)]
    pub favorites_count: i64,

    /// Remaining client-defined fields
    #[serde(flatten)]
    pub fields: Document,
}

impl From<LessonDoc> for Lesson {
    fn from(doc: LessonDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            category: doc.category,
            emotional_tone: doc.emotional_tone,
            access_level: doc.access_level,
            created_at: doc.created_at.to_chrono(),
            likes: doc.likes,
            likes_count: doc.likes_count,
            favorites_count: doc.favorites_count,
            fields: document_to_fields(doc.fields),
        }
    }
}

impl TryFrom<Lesson> for LessonDoc {
    type Error = ApiError;

    fn try_from(lesson: Lesson) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_object_id(&lesson.id)?,
            category: lesson.category,
            emotional_tone: lesson.emotional_tone,
            access_level: lesson.access_level,
            created_at: DateTime::from_chrono(lesson.created_at),
            likes: lesson.likes,
            likes_count: lesson.likes_count,
            favorites_count: lesson.favorites_count,
            fields: fields_to_document(lesson.fields)?,
        })
    }
}

impl IntoIndexes for LessonDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Listing is newest first
            (
                doc! { "createdAt": -1 },
                Some(
                    IndexOptions::builder()
                        .name("created_at_desc".to_string())
                        .build(),
                ),
            ),
            // Recommendation lookups
            (
                doc! { "category": 1, "accessLevel": 1 },
                Some(
                    IndexOptions::builder()
                        .name("category_access".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "emotionalTone": 1, "accessLevel": 1 },
                Some(
                    IndexOptions::builder()
                        .name("emotional_tone_access".to_string())
                        .build(),
                ),
            ),
        ]
    }
}
