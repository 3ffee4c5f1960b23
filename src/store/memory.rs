//! In-memory store
//!
//! Used by the test suite and as the dev-mode fallback when MongoDB is
//! unreachable. A single lock guards all collections, so every operation is
//! atomic with respect to the others.

use tokio::sync::RwLock;
use tracing::debug;

use super::{InsertOutcome, LessonStore};
use crate::model::{Comment, Favorite, Lesson, Report, User};
use crate::types::Result;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    lessons: Vec<Lesson>,
    favorites: Vec<Favorite>,
    reports: Vec<Report>,
    comments: Vec<Comment>,
}

/// Store keeping every collection in process memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of favorites referencing a lesson
    pub async fn favorite_count(&self, lesson_id: &str) -> usize {
        self.inner
            .read()
            .await
            .favorites
            .iter()
            .filter(|f| f.lesson_id == lesson_id)
            .count()
    }

    /// Number of reports filed against a lesson
    pub async fn report_count(&self, lesson_id: &str) -> usize {
        self.inner
            .read()
            .await
            .reports
            .iter()
            .filter(|r| r.lesson_id == lesson_id)
            .count()
    }
}

/// Newest first; equal timestamps keep the most recently inserted first
fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

#[async_trait::async_trait]
impl LessonStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_users(&self, email: Option<&str>) -> Result<Vec<User>> {
        let data = self.inner.read().await;
        Ok(data
            .users
            .iter()
            .filter(|u| email.map_or(true, |e| u.email == e))
            .cloned()
            .collect())
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<InsertOutcome> {
        let mut data = self.inner.write().await;
        if data.users.iter().any(|u| u.email == user.email) {
            return Ok(InsertOutcome::Duplicate);
        }
        let id = user.id.clone();
        data.users.push(user);
        Ok(InsertOutcome::Inserted(id))
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>> {
        let data = self.inner.read().await;
        Ok(newest_first(&data.lessons, |l| l.created_at))
    }

    async fn insert_lesson(&self, lesson: Lesson) -> Result<String> {
        let id = lesson.id.clone();
        self.inner.write().await.lessons.push(lesson);
        Ok(id)
    }

    async fn find_lesson(&self, id: &str) -> Result<Option<Lesson>> {
        let data = self.inner.read().await;
        Ok(data.lessons.iter().find(|l| l.id == id).cloned())
    }

    async fn find_recommended(&self, lesson: &Lesson, limit: i64) -> Result<Vec<Lesson>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let data = self.inner.read().await;
        Ok(data
            .lessons
            .iter()
            .filter(|other| lesson.recommends(other))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn set_like(&self, lesson_id: &str, user_id: &str, liked: bool) -> Result<bool> {
        let mut data = self.inner.write().await;
        let Some(lesson) = data.lessons.iter_mut().find(|l| l.id == lesson_id) else {
            return Ok(false);
        };

        let present = lesson.is_liked_by(user_id);
        match (liked, present) {
            (true, false) => {
                lesson.likes.push(user_id.to_string());
                lesson.likes_count += 1;
            }
            (false, true) => {
                lesson.likes.retain(|id| id != user_id);
                lesson.likes_count -= 1;
            }
            _ => {
                debug!(lesson_id, user_id, liked, "Like membership already matches");
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn adjust_favorites_count(&self, lesson_id: &str, delta: i64) -> Result<bool> {
        let mut data = self.inner.write().await;
        match data.lessons.iter_mut().find(|l| l.id == lesson_id) {
            Some(lesson) => {
                lesson.favorites_count += delta;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_favorite(&self, favorite: Favorite) -> Result<InsertOutcome> {
        let mut data = self.inner.write().await;
        if data
            .favorites
            .iter()
            .any(|f| f.is_pair(&favorite.lesson_id, &favorite.user_email))
        {
            return Ok(InsertOutcome::Duplicate);
        }
        let id = favorite.id.clone();
        data.favorites.push(favorite);
        Ok(InsertOutcome::Inserted(id))
    }

    async fn delete_favorite(&self, lesson_id: &str, user_email: &str) -> Result<u64> {
        let mut data = self.inner.write().await;
        match data
            .favorites
            .iter()
            .position(|f| f.is_pair(lesson_id, user_email))
        {
            Some(index) => {
                data.favorites.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn insert_report(&self, report: Report) -> Result<InsertOutcome> {
        let mut data = self.inner.write().await;
        if data
            .reports
            .iter()
            .any(|r| r.is_pair(&report.lesson_id, &report.reporter_email))
        {
            return Ok(InsertOutcome::Duplicate);
        }
        let id = report.id.clone();
        data.reports.push(report);
        Ok(InsertOutcome::Inserted(id))
    }

    async fn insert_comment(&self, comment: Comment) -> Result<String> {
        let id = comment.id.clone();
        self.inner.write().await.comments.push(comment);
        Ok(id)
    }

    async fn list_comments(&self, lesson_id: Option<&str>) -> Result<Vec<Comment>> {
        let data = self.inner.read().await;
        let matching: Vec<Comment> = data
            .comments
            .iter()
            .filter(|c| lesson_id.map_or(true, |id| c.lesson_id == id))
            .cloned()
            .collect();
        Ok(newest_first(&matching, |c| c.created_at))
    }
}
