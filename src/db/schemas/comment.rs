//! Comment document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use super::parse_object_id;
use crate::db::mongo::IntoIndexes;
use crate::model::Comment;
use crate::types::ApiError;

/// Collection name for comments
pub const COMMENT_COLLECTION: &str = "comments";

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub lesson_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commenter_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commenter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime,
}

impl From<CommentDoc> for Comment {
    fn from(doc: CommentDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            lesson_id: doc.lesson_id,
            commenter_email: doc.commenter_email,
            commenter_name: doc.commenter_name,
            comment: doc.comment,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

impl TryFrom<Comment> for CommentDoc {
    type Error = ApiError;

    fn try_from(comment: Comment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_object_id(&comment.id)?,
            lesson_id: comment.lesson_id,
            commenter_email: comment.commenter_email,
            commenter_name: comment.commenter_name,
            comment: comment.comment,
            created_at: DateTime::from_chrono(comment.created_at),
        })
    }
}

impl IntoIndexes for CommentDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "lessonId": 1, "createdAt": -1 },
            Some(
                IndexOptions::builder()
                    .name("lesson_created_at".to_string())
                    .build(),
            ),
        )]
    }
}
