//! Engagement service
//!
//! Likes, favorites and reports. Keeps the lesson's `likesCount` and
//! `favoritesCount` in step with the liker set and the favorites collection.
//!
//! Like updates are single conditional updates and cannot drift. Favorite
//! add/remove are two writes (favorite document, then lesson counter) with
//! nothing rolling back the first if the second fails.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::{Favorite, Report};
use crate::store::{InsertOutcome, LessonStore};
use crate::types::{ApiError, Result};

/// Result of adding a favorite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added,
    AlreadyFavorited,
}

/// Counter-maintaining operations over a shared store handle
#[derive(Clone)]
pub struct EngagementService {
    store: Arc<dyn LessonStore>,
}

impl EngagementService {
    pub fn new(store: Arc<dyn LessonStore>) -> Self {
        Self { store }
    }

    /// Invert `user_id`'s like on a lesson; returns whether it is now liked
    ///
    /// If a concurrent toggle from the same user already moved membership to
    /// the requested state, the update is skipped and the counter untouched.
    pub async fn toggle_like(&self, lesson_id: &str, user_id: &str) -> Result<bool> {
        let lesson = self
            .store
            .find_lesson(lesson_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Lesson not found".into()))?;

        let liked = !lesson.is_liked_by(user_id);
        if !self.store.set_like(lesson_id, user_id, liked).await? {
            debug!(lesson_id, user_id, liked, "Like already in requested state");
        }

        Ok(liked)
    }

    /// Record a favorite unless the pair already exists, then bump the counter
    pub async fn add_favorite(&self, lesson_id: &str, user_email: &str) -> Result<FavoriteOutcome> {
        let favorite = Favorite::new(lesson_id, user_email);
        if let InsertOutcome::Duplicate = self.store.insert_favorite(favorite).await? {
            return Ok(FavoriteOutcome::AlreadyFavorited);
        }

        if !self.store.adjust_favorites_count(lesson_id, 1).await? {
            warn!(lesson_id, user_email, "Favorite recorded for a lesson that does not exist");
        }

        Ok(FavoriteOutcome::Added)
    }

    /// Delete a favorite; the counter only moves when a document was deleted.
    /// Returns the deleted count.
    pub async fn remove_favorite(&self, lesson_id: &str, user_email: &str) -> Result<u64> {
        let deleted = self.store.delete_favorite(lesson_id, user_email).await?;
        if deleted == 1 && !self.store.adjust_favorites_count(lesson_id, -1).await? {
            warn!(lesson_id, user_email, "Favorite removed for a lesson that does not exist");
        }
        Ok(deleted)
    }

    /// File a report; a second report for the same pair is a conflict
    pub async fn submit_report(
        &self,
        lesson_id: &str,
        reporter_email: &str,
        reason: Option<String>,
    ) -> Result<String> {
        match self
            .store
            .insert_report(Report::new(lesson_id, reporter_email, reason))
            .await?
        {
            InsertOutcome::Inserted(id) => Ok(id),
            InsertOutcome::Duplicate => Err(ApiError::Conflict("Already reported".into())),
        }
    }
}
