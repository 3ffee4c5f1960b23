//! User routes
//!
//! - GET  /users?email=      list, optionally filtered by email
//! - GET  /users/:email/status
//! - POST /users             create unless the email is already registered

use bytes::Bytes;
use hyper::{Response, StatusCode};
use tracing::debug;

use super::response::{
    failure_response, json_response, message_response, parse_body, query_param, required,
    FullBody, InsertResult,
};
use crate::model::{NewUser, User, UserStatus};
use crate::server::AppState;
use crate::store::InsertOutcome;

pub async fn list_users(state: &AppState, query: Option<&str>) -> Response<FullBody> {
    let email = query_param(query, "email").filter(|e| !e.is_empty());

    match state.store.find_users(email.as_deref()).await {
        Ok(users) => json_response(StatusCode::OK, &users),
        Err(e) => failure_response(&e, "Failed to fetch users"),
    }
}

/// Premium flag and role; unknown users get the defaults
pub async fn user_status(state: &AppState, email: &str) -> Response<FullBody> {
    match state.store.find_user(email).await {
        Ok(user) => json_response(StatusCode::OK, &UserStatus::of(user.as_ref())),
        Err(e) => failure_response(&e, "Failed to fetch user status"),
    }
}

pub async fn create_user(state: &AppState, body: &Bytes) -> Response<FullBody> {
    let new: NewUser = match parse_body(body) {
        Ok(n) => n,
        Err(response) => return response,
    };
    let email = match required(&new.email, "email") {
        Ok(e) => e.to_string(),
        Err(response) => return response,
    };

    let user = User::create(email, new.fields);
    match state.store.insert_user(user).await {
        Ok(InsertOutcome::Inserted(id)) => json_response(StatusCode::OK, &InsertResult::new(id)),
        Ok(InsertOutcome::Duplicate) => {
            debug!("User already registered");
            message_response(StatusCode::OK, "User already exists")
        }
        Err(e) => failure_response(&e, "Failed to create user"),
    }
}
