//! Liveness, readiness and build information
//!
//! - /        plain-text liveness
//! - /health  JSON liveness, always 200 while the process serves requests
//! - /ready   200 only when the store answers a ping
//! - /version build information

use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::warn;

use super::response::{json_response, text_response, FullBody};
use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    /// Store backend ("mongodb" or "memory")
    pub store: &'static str,
    /// "development" or "production"
    pub mode: &'static str,
    pub uptime_secs: u64,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Version information for deployment verification
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub commit_full: &'static str,
    pub build_time: &'static str,
    pub service: &'static str,
}

fn build_health_response(state: &AppState, error: Option<String>) -> HealthResponse {
    HealthResponse {
        healthy: error.is_none(),
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend_name(),
        mode: if state.args.dev_mode {
            "development"
        } else {
            "production"
        },
        uptime_secs: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        error,
    }
}

pub fn hello() -> Response<FullBody> {
    text_response(StatusCode::OK, "Hello World!")
}

pub fn health_check(state: &AppState) -> Response<FullBody> {
    json_response(StatusCode::OK, &build_health_response(state, None))
}

pub async fn readiness_check(state: &AppState) -> Response<FullBody> {
    match state.store.ping().await {
        Ok(()) => json_response(StatusCode::OK, &build_health_response(state, None)),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                &build_health_response(state, Some(e.to_string())),
            )
        }
    }
}

pub fn version_info() -> Response<FullBody> {
    json_response(
        StatusCode::OK,
        &VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
            commit_full: option_env!("GIT_COMMIT_FULL").unwrap_or("unknown"),
            build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
            service: "lessons-api",
        },
    )
}
