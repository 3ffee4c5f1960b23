//! Favorite routes
//!
//! - POST   /favorites  add (idempotent; "Already favorited" on repeat)
//! - DELETE /favorites  remove; pair from the JSON body or the query string

use bytes::Bytes;
use hyper::{Response, StatusCode};
use serde::Deserialize;

use super::response::{
    failure_response, json_response, message_response, parse_body, query_param, required,
    success_response, DeleteResult, FullBody, Handled,
};
use crate::server::AppState;
use crate::services::FavoriteOutcome;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteRequest {
    #[serde(default)]
    lesson_id: Option<String>,
    #[serde(default)]
    user_email: Option<String>,
}

impl FavoriteRequest {
    fn pair(&self) -> Handled<(&str, &str)> {
        Ok((
            required(&self.lesson_id, "lessonId")?,
            required(&self.user_email, "userEmail")?,
        ))
    }
}

pub async fn add_favorite(state: &AppState, body: &Bytes) -> Response<FullBody> {
    let request: FavoriteRequest = match parse_body(body) {
        Ok(r) => r,
        Err(response) => return response,
    };
    let (lesson_id, user_email) = match request.pair() {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    match state.engagement.add_favorite(lesson_id, user_email).await {
        Ok(FavoriteOutcome::Added) => success_response(),
        Ok(FavoriteOutcome::AlreadyFavorited) => {
            message_response(StatusCode::OK, "Already favorited")
        }
        Err(e) => failure_response(&e, "Failed to add favorite"),
    }
}

pub async fn remove_favorite(
    state: &AppState,
    query: Option<&str>,
    body: &Bytes,
) -> Response<FullBody> {
    // Some clients cannot send a body with DELETE
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        FavoriteRequest {
            lesson_id: query_param(query, "lessonId"),
            user_email: query_param(query, "userEmail"),
        }
    } else {
        match parse_body(body) {
            Ok(r) => r,
            Err(response) => return response,
        }
    };
    let (lesson_id, user_email) = match request.pair() {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    match state.engagement.remove_favorite(lesson_id, user_email).await {
        Ok(deleted) => json_response(StatusCode::OK, &DeleteResult::new(deleted)),
        Err(e) => failure_response(&e, "Failed to remove favorite"),
    }
}
