//! Database layer
//!
//! MongoDB client, typed collections, document schemas and the
//! Mongo-backed [`LessonStore`](crate::store::LessonStore).

pub mod mongo;
pub mod schemas;
mod store;

pub use mongo::{MongoClient, MongoCollection};
pub use schemas::{CommentDoc, FavoriteDoc, LessonDoc, ReportDoc, UserDoc};
pub use store::MongoStore;
