//! Store abstraction
//!
//! Handlers and the engagement service only see `LessonStore`. The store is
//! built once at start-up and shared through `AppState`, so tests and dev
//! mode can swap MongoDB for [`MemoryStore`].

mod memory;

pub use memory::MemoryStore;

use crate::model::{Comment, Favorite, Lesson, Report, User};
use crate::types::Result;

/// Outcome of an insert guarded by a uniqueness constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Document inserted with this id
    Inserted(String),
    /// A document with the same natural key already exists
    Duplicate,
}

impl InsertOutcome {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// Document store for users, lessons, favorites, reports and comments
///
/// Lesson ids that are not valid ObjectId hex never match a lesson.
#[async_trait::async_trait]
pub trait LessonStore: Send + Sync {
    /// Short backend name for health output
    fn backend_name(&self) -> &'static str;

    /// Check the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// All users, or only those with the given email
    async fn find_users(&self, email: Option<&str>) -> Result<Vec<User>>;

    async fn find_user(&self, email: &str) -> Result<Option<User>>;

    /// Insert unless a user with the same email exists
    async fn insert_user(&self, user: User) -> Result<InsertOutcome>;

    /// All lessons, newest first
    async fn list_lessons(&self) -> Result<Vec<Lesson>>;

    async fn insert_lesson(&self, lesson: Lesson) -> Result<String>;

    async fn find_lesson(&self, id: &str) -> Result<Option<Lesson>>;

    /// Up to `limit` public lessons sharing the category or emotional tone
    /// of `lesson`, excluding `lesson` itself
    async fn find_recommended(&self, lesson: &Lesson, limit: i64) -> Result<Vec<Lesson>>;

    /// Add (`liked`) or remove `user_id` from the lesson's liker set and move
    /// `likesCount` by one in the same update.
    ///
    /// The update only applies when current membership differs from `liked`;
    /// returns whether it applied. A missing lesson returns `false`.
    async fn set_like(&self, lesson_id: &str, user_id: &str, liked: bool) -> Result<bool>;

    /// Add `delta` to the lesson's `favoritesCount`; returns whether a lesson matched
    async fn adjust_favorites_count(&self, lesson_id: &str, delta: i64) -> Result<bool>;

    /// Insert unless the (lesson, user email) pair is already favorited
    async fn insert_favorite(&self, favorite: Favorite) -> Result<InsertOutcome>;

    /// Delete the favorite for the pair; returns the number of deleted documents
    async fn delete_favorite(&self, lesson_id: &str, user_email: &str) -> Result<u64>;

    /// Insert unless the (lesson, reporter email) pair already reported
    async fn insert_report(&self, report: Report) -> Result<InsertOutcome>;

    async fn insert_comment(&self, comment: Comment) -> Result<String>;

    /// Comments for a lesson (or all comments), newest first
    async fn list_comments(&self, lesson_id: Option<&str>) -> Result<Vec<Comment>>;
}
