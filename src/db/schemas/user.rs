//! User document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use super::{document_to_fields, fields_to_document, parse_object_id};
use crate::db::mongo::IntoIndexes;
use crate::model::{User, DEFAULT_ROLE};
use crate::types::ApiError;

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// User document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Natural key
    pub email: String,

    pub created_at: DateTime,

    #[serde(default)]
    pub is_premium: bool,

    #[serde(default = "default_role")]
    pub role: String,

    #[serde(flatten)]
    pub fields: Document,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

impl From<UserDoc> for User {
    fn from(doc: UserDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            email: doc.email,
            created_at: doc.created_at.to_chrono(),
            is_premium: doc.is_premium,
            role: doc.role,
            fields: document_to_fields(doc.fields),
        }
    }
}

impl TryFrom<User> for UserDoc {
    type Error = ApiError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_object_id(&user.id)?,
            email: user.email,
            created_at: DateTime::from_chrono(user.created_at),
            is_premium: user.is_premium,
            role: user.role,
            fields: fields_to_document(user.fields)?,
        })
    }
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "email": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .partial_filter_expression(doc! { "email": { "$type": "string" } })
                    .build(),
            ),
        )]
    }
}
