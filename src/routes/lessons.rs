//! Lesson routes
//!
//! - GET   /lessons           all lessons, newest first
//! - POST  /lessons           create with zeroed counters
//! - GET   /lessons/:id       lesson plus recommendations
//! - PATCH /lessons/:id/like  toggle the caller's like

use bytes::Bytes;
use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::response::{
    failure_response, json_response, message_response, parse_body, required, FullBody,
    InsertResult,
};
use crate::model::{Lesson, LessonDetail, NewLesson};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikeRequest {
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct LikeResponse {
    liked: bool,
}

pub async fn list_lessons(state: &AppState) -> Response<FullBody> {
    match state.store.list_lessons().await {
        Ok(lessons) => json_response(StatusCode::OK, &lessons),
        Err(e) => failure_response(&e, "Failed to fetch lessons"),
    }
}

pub async fn create_lesson(state: &AppState, body: &Bytes) -> Response<FullBody> {
    let new: NewLesson = match parse_body(body) {
        Ok(n) => n,
        Err(response) => return response,
    };

    match state.store.insert_lesson(Lesson::create(new)).await {
        Ok(id) => json_response(StatusCode::OK, &InsertResult::new(id)),
        Err(e) => failure_response(&e, "Failed to create lesson"),
    }
}

pub async fn get_lesson(state: &AppState, id: &str) -> Response<FullBody> {
    let lesson = match state.store.find_lesson(id).await {
        Ok(Some(lesson)) => lesson,
        Ok(None) => return message_response(StatusCode::NOT_FOUND, "Lesson not found"),
        Err(e) => return failure_response(&e, "Failed to fetch lesson"),
    };

    match state
        .store
        .find_recommended(&lesson, state.args.recommended_limit)
        .await
    {
        Ok(recommended) => json_response(StatusCode::OK, &LessonDetail { lesson, recommended }),
        Err(e) => failure_response(&e, "Failed to fetch lesson"),
    }
}

pub async fn toggle_like(state: &AppState, id: &str, body: &Bytes) -> Response<FullBody> {
    let request: LikeRequest = match parse_body(body) {
        Ok(r) => r,
        Err(response) => return response,
    };
    let user_id = match required(&request.user_id, "userId") {
        Ok(u) => u,
        Err(response) => return response,
    };

    match state.engagement.toggle_like(id, user_id).await {
        Ok(liked) => json_response(StatusCode::OK, &LikeResponse { liked }),
        Err(e) => failure_response(&e, "Failed to update like"),
    }
}
