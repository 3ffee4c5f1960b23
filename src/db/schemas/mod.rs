//! Database schemas
//!
//! MongoDB document structures for the five collections. Field names are
//! camelCase to stay compatible with documents written by earlier clients.

mod comment;
mod favorite;
mod lesson;
mod report;
mod user;

pub use comment::{CommentDoc, COMMENT_COLLECTION};
pub use favorite::{FavoriteDoc, FAVORITE_COLLECTION};
pub use lesson::{LessonDoc, LESSON_COLLECTION};
pub use report::{ReportDoc, REPORT_COLLECTION};
pub use user::{UserDoc, USER_COLLECTION};

use bson::{oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};

use crate::types::{ApiError, Result};

/// Parse a hex identifier into an ObjectId
pub fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ApiError::BadRequest(format!("Invalid id: {}", id)))
}

/// Convert client-defined JSON fields into a BSON document
pub fn fields_to_document(fields: Map<String, Value>) -> Result<Document> {
    Ok(bson::to_document(&fields)?)
}

/// Convert stored free-form fields back into JSON
pub fn document_to_fields(doc: Document) -> Map<String, Value> {
    match Bson::Document(doc).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_round_trip() {
        let mut fields = Map::new();
        fields.insert("title".into(), json!("Letting go"));
        fields.insert("tags".into(), json!(["a", "b"]));
        fields.insert("readMinutes".into(), json!(4));

        let doc = fields_to_document(fields.clone()).unwrap();
        assert_eq!(doc.get_str("title").unwrap(), "Letting go");
        assert_eq!(document_to_fields(doc), fields);
    }

    #[test]
    fn test_parse_object_id() {
        assert!(parse_object_id("507f1f77bcf86cd799439011").is_ok());
        assert!(matches!(parse_object_id("L1"), Err(ApiError::BadRequest(_))));
    }
}
