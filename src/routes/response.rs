//! Response builders and request helpers shared by the route handlers

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use crate::types::ApiError;

pub type FullBody = Full<Bytes>;

/// Outcome of a handler step that may already have produced the response
pub type Handled<T> = std::result::Result<T, Response<FullBody>>;

/// `{acknowledged, insertedId}` as returned for created users and lessons
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertResult {
    pub fn new(inserted_id: String) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// `{acknowledged, deletedCount}` as returned by DELETE /favorites
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct SuccessBody {
    success: bool,
}

fn with_body(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<FullBody> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<FullBody> {
    let json = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    with_body(status, "application/json", Bytes::from(json))
}

/// `{message}` body, used for errors and soft conflicts
pub fn message_response(status: StatusCode, message: &str) -> Response<FullBody> {
    json_response(status, &MessageBody { message })
}

pub fn success_response() -> Response<FullBody> {
    json_response(StatusCode::OK, &SuccessBody { success: true })
}

pub fn text_response(status: StatusCode, text: &'static str) -> Response<FullBody> {
    with_body(status, "text/plain; charset=utf-8", Bytes::from_static(text.as_bytes()))
}

pub fn not_found_response() -> Response<FullBody> {
    message_response(StatusCode::NOT_FOUND, "Not found")
}

/// Map a failed operation to a response
///
/// Server-side failures are logged and answered with the endpoint's fixed
/// message; client errors keep their own message and status.
pub fn failure_response(err: &ApiError, fixed_message: &str) -> Response<FullBody> {
    if err.is_server_error() {
        error!("{}: {}", fixed_message, err);
        return message_response(StatusCode::INTERNAL_SERVER_ERROR, fixed_message);
    }
    message_response(err.status_code(), err.client_message())
}

/// Parse a JSON request body; an empty body reads as `{}`
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Handled<T> {
    let bytes: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(bytes)
        .map_err(|_| message_response(StatusCode::BAD_REQUEST, "Invalid JSON body"))
}

/// Presence check for a required request field
pub fn required<'a>(value: &'a Option<String>, field: &str) -> Handled<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(message_response(
            StatusCode::BAD_REQUEST,
            &format!("{} is required", field),
        )),
    }
}

/// Decoded value of a query string parameter
pub fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    query?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k != key {
            return None;
        }
        let v = v.replace('+', " ");
        Some(
            urlencoding::decode(&v)
                .map(|s| s.into_owned())
                .unwrap_or(v),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_query_param() {
        let q = Some("lessonId=abc&email=a%40x.com&name=Ada+L");
        assert_eq!(query_param(q, "lessonId").as_deref(), Some("abc"));
        assert_eq!(query_param(q, "email").as_deref(), Some("a@x.com"));
        assert_eq!(query_param(q, "name").as_deref(), Some("Ada L"));
        assert_eq!(query_param(q, "missing"), None);
        assert_eq!(query_param(None, "email"), None);
        assert_eq!(query_param(Some("flag"), "flag").as_deref(), Some(""));
    }

    #[test]
    fn test_parse_body_empty_is_object() {
        let parsed: Value = parse_body(&Bytes::new()).unwrap();
        assert_eq!(parsed, serde_json::json!({}));

        let bad = parse_body::<Value>(&Bytes::from_static(b"{not json"));
        assert_eq!(bad.unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_required() {
        let present = Some("u1".to_string());
        assert_eq!(tokio_test::assert_ok!(required(&present, "userId")), "u1");
        tokio_test::assert_err!(required(&Some(String::new()), "userId"));
        tokio_test::assert_err!(required(&None, "userId"));
    }

    #[test]
    fn test_failure_hides_store_errors() {
        let response = failure_response(
            &ApiError::Database("connection reset".into()),
            "Failed to fetch lessons",
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = failure_response(
            &ApiError::NotFound("Lesson not found".into()),
            "Failed to fetch lesson",
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
