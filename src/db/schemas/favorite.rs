//! Favorite document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use super::parse_object_id;
use crate::db::mongo::IntoIndexes;
use crate::model::Favorite;
use crate::types::ApiError;

/// Collection name for favorites
pub const FAVORITE_COLLECTION: &str = "favorites";

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Lesson id as sent by the client (hex string, not an ObjectId)
    pub lesson_id: String,
    pub user_email: String,
    pub created_at: DateTime,
}

impl From<FavoriteDoc> for Favorite {
    fn from(doc: FavoriteDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            lesson_id: doc.lesson_id,
            user_email: doc.user_email,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

impl TryFrom<Favorite> for FavoriteDoc {
    type Error = ApiError;

    fn try_from(favorite: Favorite) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_object_id(&favorite.id)?,
            lesson_id: favorite.lesson_id,
            user_email: favorite.user_email,
            created_at: DateTime::from_chrono(favorite.created_at),
        })
    }
}

impl IntoIndexes for FavoriteDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            // One favorite per (lesson, user)
            doc! { "lessonId": 1, "userEmail": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("lesson_user_unique".to_string())
                    .partial_filter_expression(doc! {
                        "lessonId": { "$type": "string" },
                        "userEmail": { "$type": "string" },
                    })
                    .build(),
            ),
        )]
    }
}
