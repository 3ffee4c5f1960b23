//! Comment routes
//!
//! - GET  /comments?lessonId=  newest first, all comments when no lesson is given
//! - POST /comments

use bytes::Bytes;
use hyper::{Response, StatusCode};

use super::response::{
    failure_response, json_response, parse_body, query_param, required, success_response,
    FullBody,
};
use crate::model::{Comment, NewComment};
use crate::server::AppState;

pub async fn list_comments(state: &AppState, query: Option<&str>) -> Response<FullBody> {
    let lesson_id = query_param(query, "lessonId").filter(|id| !id.is_empty());

    match state.store.list_comments(lesson_id.as_deref()).await {
        Ok(comments) => json_response(StatusCode::OK, &comments),
        Err(e) => failure_response(&e, "Failed to fetch comments"),
    }
}

pub async fn post_comment(state: &AppState, body: &Bytes) -> Response<FullBody> {
    let new: NewComment = match parse_body(body) {
        Ok(n) => n,
        Err(response) => return response,
    };
    let lesson_id = match required(&new.lesson_id, "lessonId") {
        Ok(id) => id.to_string(),
        Err(response) => return response,
    };

    match state.store.insert_comment(Comment::create(lesson_id, new)).await {
        Ok(_) => success_response(),
        Err(e) => failure_response(&e, "Failed to post comment"),
    }
}
