//! Report document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use super::parse_object_id;
use crate::db::mongo::IntoIndexes;
use crate::model::Report;
use crate::types::ApiError;

/// Collection name for reports
pub const REPORT_COLLECTION: &str = "reports";

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReportDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub lesson_id: String,
    pub reporter_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime,
}

impl From<ReportDoc> for Report {
    fn from(doc: ReportDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            lesson_id: doc.lesson_id,
            reporter_email: doc.reporter_email,
            reason: doc.reason,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

impl TryFrom<Report> for ReportDoc {
    type Error = ApiError;

    fn try_from(report: Report) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_object_id(&report.id)?,
            lesson_id: report.lesson_id,
            reporter_email: report.reporter_email,
            reason: report.reason,
            created_at: DateTime::from_chrono(report.created_at),
        })
    }
}

impl IntoIndexes for ReportDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            // One report per (lesson, reporter)
            doc! { "lessonId": 1, "reporterEmail": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("lesson_reporter_unique".to_string())
                    .partial_filter_expression(doc! {
                        "lessonId": { "$type": "string" },
                        "reporterEmail": { "$type": "string" },
                    })
                    .build(),
            ),
        )]
    }
}
