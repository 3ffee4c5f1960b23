//! Lessons API
//!
//! HTTP backend for a life-lessons application: users, lessons with likes
//! and recommendations, favorites, reports and comments over MongoDB.
//!
//! ## Layout
//!
//! - `config`   - CLI/environment configuration
//! - `types`    - error type and result alias
//! - `model`    - documents exchanged over HTTP
//! - `store`    - `LessonStore` trait and the in-memory store
//! - `db`       - MongoDB client, schemas and the Mongo-backed store
//! - `services` - like/favorite/report logic keeping lesson counters in step
//! - `routes`   - request handlers and dispatch
//! - `server`   - shared state and the accept loop

pub mod config;
pub mod db;
pub mod model;
pub mod routes;
pub mod server;
pub mod services;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{ApiError, Result};
