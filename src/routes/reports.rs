//! POST /reports

use bytes::Bytes;
use hyper::Response;
use serde::Deserialize;

use super::response::{failure_response, parse_body, required, success_response, FullBody};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRequest {
    #[serde(default)]
    lesson_id: Option<String>,
    #[serde(default)]
    reporter_email: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// File a report; a repeat from the same reporter is a 400 "Already reported"
pub async fn submit_report(state: &AppState, body: &Bytes) -> Response<FullBody> {
    let request: ReportRequest = match parse_body(body) {
        Ok(r) => r,
        Err(response) => return response,
    };
    let lesson_id = match required(&request.lesson_id, "lessonId") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let reporter_email = match required(&request.reporter_email, "reporterEmail") {
        Ok(email) => email,
        Err(response) => return response,
    };

    match state
        .engagement
        .submit_report(lesson_id, reporter_email, request.reason.clone())
        .await
    {
        Ok(_) => success_response(),
        Err(e) => failure_response(&e, "Failed to report lesson"),
    }
}
