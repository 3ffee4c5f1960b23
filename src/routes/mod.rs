//! HTTP routes for the lessons API
//!
//! [`dispatch`] maps a method and decoded path segments onto a handler and
//! stamps the CORS header on whatever comes back.

pub mod comments;
pub mod favorites;
pub mod health;
pub mod lessons;
pub mod reports;
pub mod response;
pub mod users;

pub use health::{health_check, readiness_check, version_info};
pub use response::{json_response, message_response, FullBody};

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use hyper::{Method, Response, StatusCode};

use crate::server::AppState;

const ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";

/// Route a request and return the response
pub async fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    query: Option<&str>,
    body: Bytes,
) -> Response<FullBody> {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            urlencoding::decode(s)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| s.to_string())
        })
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    let mut response = match (method, segments.as_slice()) {
        (&Method::OPTIONS, _) => preflight_response(),

        (&Method::GET, []) => health::hello(),
        (&Method::GET, ["health"]) => health::health_check(state),
        (&Method::GET, ["ready"]) => health::readiness_check(state).await,
        (&Method::GET, ["version"]) => health::version_info(),

        (&Method::GET, ["users"]) => users::list_users(state, query).await,
        (&Method::POST, ["users"]) => users::create_user(state, &body).await,
        (&Method::GET, ["users", email, "status"]) => users::user_status(state, email).await,

        (&Method::GET, ["lessons"]) => lessons::list_lessons(state).await,
        (&Method::POST, ["lessons"]) => lessons::create_lesson(state, &body).await,
        (&Method::GET, ["lessons", id]) => lessons::get_lesson(state, id).await,
        (&Method::PATCH, ["lessons", id, "like"]) => lessons::toggle_like(state, id, &body).await,

        (&Method::POST, ["favorites"]) => favorites::add_favorite(state, &body).await,
        (&Method::DELETE, ["favorites"]) => {
            favorites::remove_favorite(state, query, &body).await
        }

        (&Method::POST, ["reports"]) => reports::submit_report(state, &body).await,

        (&Method::GET, ["comments"]) => comments::list_comments(state, query).await,
        (&Method::POST, ["comments"]) => comments::post_comment(state, &body).await,

        _ => response::not_found_response(),
    };

    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// CORS preflight response
fn preflight_response() -> Response<FullBody> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    response
}
