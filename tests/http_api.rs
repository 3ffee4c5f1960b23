//! HTTP API integration tests
//!
//! Drives `routes::dispatch` end to end against the in-memory store:
//! - Lesson creation, lookup and recommendations
//! - Like toggling and counter consistency
//! - Favorites, reports and comments
//! - Users, health and routing edge cases

use bytes::Bytes;
use clap::Parser;
use http_body_util::BodyExt;
use hyper::{Method, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;

use lessons_api::{routes, store::MemoryStore, AppState, Args};

fn state() -> AppState {
    let args = Args::try_parse_from(["lessons-api", "--dev-mode"]).unwrap();
    AppState::new(args, Arc::new(MemoryStore::new()))
}

async fn call_raw(state: &AppState, method: Method, uri: &str, body: Bytes) -> (StatusCode, Bytes) {
    let (path, query) = match uri.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (uri, None),
    };
    let response = routes::dispatch(state, &method, path, query, body).await;
    let origin = response.headers().get("access-control-allow-origin").unwrap();
    assert_eq!(origin.to_str().unwrap(), "*");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes)
}

async fn call(state: &AppState, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let body = if body.is_null() {
        Bytes::new()
    } else {
        Bytes::from(body.to_string())
    };
    let (status, bytes) = call_raw(state, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_lesson(state: &AppState, body: Value) -> String {
    let (status, result) = call(state, Method::POST, "/lessons", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["acknowledged"], json!(true));
    result["insertedId"].as_str().unwrap().to_string()
}

// =============================================================================
// Lessons
// =============================================================================

#[tokio::test]
async fn test_created_lesson_has_zeroed_counters() {
    let state = state();
    let id = create_lesson(&state, json!({ "title": "A", "category": "grief" })).await;

    let (status, lesson) = call(&state, Method::GET, &format!("/lessons/{}", id), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lesson["_id"], json!(id));
    assert_eq!(lesson["title"], json!("A"));
    assert_eq!(lesson["category"], json!("grief"));
    assert_eq!(lesson["likesCount"], json!(0));
    assert_eq!(lesson["favoritesCount"], json!(0));
    assert_eq!(lesson["likes"], json!([]));
    assert_eq!(lesson["recommended"], json!([]));
    assert!(lesson["createdAt"].is_string());
}

#[tokio::test]
async fn test_client_cannot_seed_counters() {
    let state = state();
    let id = create_lesson(&state, json!({ "title": "A", "likesCount": 99, "likes": ["x"] })).await;

    let (_, lesson) = call(&state, Method::GET, &format!("/lessons/{}", id), Value::Null).await;
    assert_eq!(lesson["likesCount"], json!(0));
    assert_eq!(lesson["likes"], json!([]));
}

#[tokio::test]
async fn test_unknown_lesson_is_404() {
    let state = state();
    for id in ["507f1f77bcf86cd799439011", "not-an-object-id"] {
        let (status, body) = call(&state, Method::GET, &format!("/lessons/{}", id), Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Lesson not found" }));
    }
}

#[tokio::test]
async fn test_recommendations() {
    let state = state();
    let id = create_lesson(
        &state,
        json!({ "category": "grief", "emotionalTone": "sad", "accessLevel": "public" }),
    )
    .await;
    for _ in 0..7 {
        create_lesson(
            &state,
            json!({ "category": "grief", "emotionalTone": "hopeful", "accessLevel": "public" }),
        )
        .await;
    }
    create_lesson(
        &state,
        json!({ "category": "career", "emotionalTone": "sad", "accessLevel": "premium" }),
    )
    .await;
    create_lesson(
        &state,
        json!({ "category": "career", "emotionalTone": "calm", "accessLevel": "public" }),
    )
    .await;

    let (_, lesson) = call(&state, Method::GET, &format!("/lessons/{}", id), Value::Null).await;
    let recommended = lesson["recommended"].as_array().unwrap();
    assert_eq!(recommended.len(), 6);
    for r in recommended {
        assert_ne!(r["_id"], json!(id));
        assert_eq!(r["accessLevel"], json!("public"));
        assert_eq!(r["category"], json!("grief"));
    }
}

#[tokio::test]
async fn test_lessons_listed_newest_first() {
    let state = state();
    let first = create_lesson(&state, json!({ "title": "first" })).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create_lesson(&state, json!({ "title": "second" })).await;

    let (status, lessons) = call(&state, Method::GET, "/lessons", Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = lessons
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
}

// =============================================================================
// Likes
// =============================================================================

#[tokio::test]
async fn test_like_toggle_twice() {
    let state = state();
    let id = create_lesson(&state, json!({ "title": "A" })).await;
    let like = format!("/lessons/{}/like", id);
    let get = format!("/lessons/{}", id);

    let (status, body) = call(&state, Method::PATCH, &like, json!({ "userId": "u1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "liked": true }));
    let (_, lesson) = call(&state, Method::GET, &get, Value::Null).await;
    assert_eq!(lesson["likesCount"], json!(1));
    assert_eq!(lesson["likes"], json!(["u1"]));

    let (_, body) = call(&state, Method::PATCH, &like, json!({ "userId": "u1" })).await;
    assert_eq!(body, json!({ "liked": false }));
    let (_, lesson) = call(&state, Method::GET, &get, Value::Null).await;
    assert_eq!(lesson["likesCount"], json!(0));
    assert_eq!(lesson["likes"], json!([]));
}

#[tokio::test]
async fn test_likes_count_tracks_likers() {
    let state = state();
    let id = create_lesson(&state, json!({})).await;
    let like = format!("/lessons/{}/like", id);

    for user in ["u1", "u2", "u3", "u2", "u4", "u1", "u5"] {
        call(&state, Method::PATCH, &like, json!({ "userId": user })).await;
    }

    let (_, lesson) = call(&state, Method::GET, &format!("/lessons/{}", id), Value::Null).await;
    let likes = lesson["likes"].as_array().unwrap();
    assert_eq!(lesson["likesCount"], json!(likes.len()));
    assert_eq!(likes.len(), 3);
}

#[tokio::test]
async fn test_like_requires_user_and_lesson() {
    let state = state();
    let id = create_lesson(&state, json!({})).await;

    let (status, _) = call(&state, Method::PATCH, &format!("/lessons/{}/like", id), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &state,
        Method::PATCH,
        "/lessons/507f1f77bcf86cd799439011/like",
        json!({ "userId": "u1" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Lesson not found"));
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn test_favorite_twice_counts_once() {
    let state = state();
    let id = create_lesson(&state, json!({})).await;
    let request = json!({ "lessonId": id, "userEmail": "a@x.com" });

    let (status, body) = call(&state, Method::POST, "/favorites", request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = call(&state, Method::POST, "/favorites", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Already favorited" }));

    let (_, lesson) = call(&state, Method::GET, &format!("/lessons/{}", id), Value::Null).await;
    assert_eq!(lesson["favoritesCount"], json!(1));
}

#[tokio::test]
async fn test_favorite_unknown_lesson_id_still_recorded() {
    let state = state();
    let request = json!({ "lessonId": "L1", "userEmail": "a@x.com" });

    let (_, body) = call(&state, Method::POST, "/favorites", request.clone()).await;
    assert_eq!(body, json!({ "success": true }));
    let (_, body) = call(&state, Method::POST, "/favorites", request).await;
    assert_eq!(body, json!({ "message": "Already favorited" }));
}

#[tokio::test]
async fn test_remove_favorite() {
    let state = state();
    let id = create_lesson(&state, json!({})).await;
    call(
        &state,
        Method::POST,
        "/favorites",
        json!({ "lessonId": id, "userEmail": "a@x.com" }),
    )
    .await;

    // Not favorited by this user: nothing deleted, counter untouched
    let (status, body) = call(
        &state,
        Method::DELETE,
        "/favorites",
        json!({ "lessonId": id, "userEmail": "b@x.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "acknowledged": true, "deletedCount": 0 }));
    let (_, lesson) = call(&state, Method::GET, &format!("/lessons/{}", id), Value::Null).await;
    assert_eq!(lesson["favoritesCount"], json!(1));

    // Pair given in the query string
    let (_, body) = call(
        &state,
        Method::DELETE,
        &format!("/favorites?lessonId={}&userEmail=a%40x.com", id),
        Value::Null,
    )
    .await;
    assert_eq!(body, json!({ "acknowledged": true, "deletedCount": 1 }));
    let (_, lesson) = call(&state, Method::GET, &format!("/lessons/{}", id), Value::Null).await;
    assert_eq!(lesson["favoritesCount"], json!(0));
}

#[tokio::test]
async fn test_favorite_presence_checks() {
    let state = state();
    let (status, body) = call(&state, Method::POST, "/favorites", json!({ "lessonId": "L1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "userEmail is required" }));

    let (status, _) = call(&state, Method::DELETE, "/favorites", Value::Null).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn test_duplicate_report_rejected() {
    let state = state();
    let id = create_lesson(&state, json!({})).await;
    let request = json!({ "lessonId": id, "reporterEmail": "a@x.com", "reason": "spam" });

    let (status, body) = call(&state, Method::POST, "/reports", request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    for _ in 0..2 {
        let (status, body) = call(&state, Method::POST, "/reports", request.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Already reported" }));
    }

    // Another reporter may still report the same lesson
    let (status, _) = call(
        &state,
        Method::POST,
        "/reports",
        json!({ "lessonId": id, "reporterEmail": "b@x.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
async fn test_comments_by_lesson_newest_first() {
    let state = state();
    for (lesson, text) in [("L1", "first"), ("L2", "other"), ("L1", "second")] {
        let (status, body) = call(
            &state,
            Method::POST,
            "/comments",
            json!({
                "lessonId": lesson,
                "commenterEmail": "a@x.com",
                "commenterName": "Ada",
                "comment": text
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (_, comments) = call(&state, Method::GET, "/comments?lessonId=L1", Value::Null).await;
    let texts: Vec<&str> = comments
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["comment"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["second", "first"]);

    let (_, all) = call(&state, Method::GET, "/comments", Value::Null).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, _) = call(&state, Method::POST, "/comments", json!({ "comment": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_users() {
    let state = state();

    let (status, body) = call(
        &state,
        Method::POST,
        "/users",
        json!({ "email": "a@x.com", "name": "Ada", "isPremium": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], json!(true));

    let (status, body) = call(&state, Method::POST, "/users", json!({ "email": "a@x.com" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "User already exists" }));

    let (_, users) = call(&state, Method::GET, "/users?email=a%40x.com", Value::Null).await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], json!("Ada"));
    assert_eq!(users[0]["isPremium"], json!(false));
    assert_eq!(users[0]["role"], json!("user"));

    let (_, status) = call(&state, Method::GET, "/users/a%40x.com/status", Value::Null).await;
    assert_eq!(status, json!({ "isPremium": false, "role": "user" }));

    let (_, status) = call(&state, Method::GET, "/users/nobody@x.com/status", Value::Null).await;
    assert_eq!(status, json!({ "isPremium": false, "role": "user" }));

    let (status, _) = call(&state, Method::POST, "/users", json!({ "name": "no email" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Health and routing
// =============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let state = state();

    let (status, body) = call_raw(&state, Method::GET, "/", Bytes::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"Hello World!");

    let (status, health) = call(&state, Method::GET, "/health", Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["healthy"], json!(true));
    assert_eq!(health["store"], json!("memory"));
    assert_eq!(health["mode"], json!("development"));

    let (status, _) = call(&state, Method::GET, "/ready", Value::Null).await;
    assert_eq!(status, StatusCode::OK);

    let (status, version) = call(&state, Method::GET, "/version", Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(version["version"], json!(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_routing_edge_cases() {
    let state = state();

    let (status, body) = call(&state, Method::GET, "/nope", Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not found" }));

    let (status, body) = call_raw(&state, Method::POST, "/lessons", Bytes::from_static(b"{oops")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "message": "Invalid JSON body" }));

    let (status, _) = call_raw(&state, Method::OPTIONS, "/favorites", Bytes::new()).await;
    assert!(status.is_success());
}
