//! MongoDB-backed store

use bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use tracing::{debug, info};

use super::mongo::{MongoClient, MongoCollection};
use super::schemas::{
    CommentDoc, FavoriteDoc, LessonDoc, ReportDoc, UserDoc, COMMENT_COLLECTION,
    FAVORITE_COLLECTION, LESSON_COLLECTION, REPORT_COLLECTION, USER_COLLECTION,
};
use crate::model::{Comment, Favorite, Lesson, Report, User, ACCESS_PUBLIC};
use crate::store::{InsertOutcome, LessonStore};
use crate::types::Result;

/// Store over the five MongoDB collections
#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    users: MongoCollection<UserDoc>,
    lessons: MongoCollection<LessonDoc>,
    favorites: MongoCollection<FavoriteDoc>,
    reports: MongoCollection<ReportDoc>,
    comments: MongoCollection<CommentDoc>,
}

impl MongoStore {
    /// Open every collection, creating indexes as needed
    pub async fn new(client: MongoClient) -> Result<Self> {
        let store = Self {
            users: client.collection(USER_COLLECTION).await?,
            lessons: client.collection(LESSON_COLLECTION).await?,
            favorites: client.collection(FAVORITE_COLLECTION).await?,
            reports: client.collection(REPORT_COLLECTION).await?,
            comments: client.collection(COMMENT_COLLECTION).await?,
            client,
        };
        info!("MongoDB collections ready in '{}'", store.client.db_name());
        Ok(store)
    }
}

/// Lesson ids that are not ObjectId hex cannot match a stored lesson
fn lesson_oid(id: &str) -> Option<ObjectId> {
    match ObjectId::parse_str(id) {
        Ok(oid) => Some(oid),
        Err(_) => {
            debug!(id, "Not an ObjectId, treating as no match");
            None
        }
    }
}

fn newest_first() -> FindOptions {
    FindOptions::builder().sort(doc! { "createdAt": -1 }).build()
}

fn outcome(inserted: Option<ObjectId>) -> InsertOutcome {
    match inserted {
        Some(oid) => InsertOutcome::Inserted(oid.to_hex()),
        None => InsertOutcome::Duplicate,
    }
}

#[async_trait::async_trait]
impl LessonStore for MongoStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.client.ping().await
    }

    async fn find_users(&self, email: Option<&str>) -> Result<Vec<User>> {
        let filter = match email {
            Some(email) => doc! { "email": email },
            None => doc! {},
        };
        let docs = self.users.find_many(filter, None).await?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>> {
        let found = self.users.find_one(doc! { "email": email }).await?;
        Ok(found.map(User::from))
    }

    async fn insert_user(&self, user: User) -> Result<InsertOutcome> {
        let doc = UserDoc::try_from(user)?;
        Ok(outcome(self.users.insert_unique(&doc).await?))
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>> {
        let docs = self.lessons.find_many(doc! {}, newest_first()).await?;
        Ok(docs.into_iter().map(Lesson::from).collect())
    }

    async fn insert_lesson(&self, lesson: Lesson) -> Result<String> {
        let doc = LessonDoc::try_from(lesson)?;
        Ok(self.lessons.insert_one(&doc).await?.to_hex())
    }

    async fn find_lesson(&self, id: &str) -> Result<Option<Lesson>> {
        let Some(oid) = lesson_oid(id) else {
            return Ok(None);
        };
        let found = self.lessons.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(Lesson::from))
    }

    async fn find_recommended(&self, lesson: &Lesson, limit: i64) -> Result<Vec<Lesson>> {
        let Some(oid) = lesson_oid(&lesson.id) else {
            return Ok(Vec::new());
        };

        // A missing attribute only matches lessons also missing it
        let filter = doc! {
            "_id": { "$ne": oid },
            "accessLevel": ACCESS_PUBLIC,
            "$or": [
                { "category": lesson.category.as_deref() },
                { "emotionalTone": lesson.emotional_tone.as_deref() },
            ],
        };
        let options = FindOptions::builder().limit(limit).build();

        let docs = self.lessons.find_many(filter, options).await?;
        Ok(docs.into_iter().map(Lesson::from).collect())
    }

    async fn set_like(&self, lesson_id: &str, user_id: &str, liked: bool) -> Result<bool> {
        let Some(oid) = lesson_oid(lesson_id) else {
            return Ok(false);
        };

        // Membership guard and counter move in one atomic update
        let (filter, update) = if liked {
            (
                doc! { "_id": oid, "likes": { "$ne": user_id } },
                doc! { "$addToSet": { "likes": user_id }, "$inc": { "likesCount": 1_i64 } },
            )
        } else {
            (
                doc! { "_id": oid, "likes": user_id },
                doc! { "$pull": { "likes": user_id }, "$inc": { "likesCount": -1_i64 } },
            )
        };

        let result = self.lessons.update_one(filter, update).await?;
        if result.modified_count == 0 {
            debug!(lesson_id, user_id, liked, "Like membership already matches");
        }
        Ok(result.modified_count == 1)
    }

    async fn adjust_favorites_count(&self, lesson_id: &str, delta: i64) -> Result<bool> {
        let Some(oid) = lesson_oid(lesson_id) else {
            return Ok(false);
        };
        let result = self
            .lessons
            .update_one(doc! { "_id": oid }, doc! { "$inc": { "favoritesCount": delta } })
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn insert_favorite(&self, favorite: Favorite) -> Result<InsertOutcome> {
        let doc = FavoriteDoc::try_from(favorite)?;
        Ok(outcome(self.favorites.insert_unique(&doc).await?))
    }

    async fn delete_favorite(&self, lesson_id: &str, user_email: &str) -> Result<u64> {
        self.favorites
            .delete_one(doc! { "lessonId": lesson_id, "userEmail": user_email })
            .await
    }

    async fn insert_report(&self, report: Report) -> Result<InsertOutcome> {
        let doc = ReportDoc::try_from(report)?;
        Ok(outcome(self.reports.insert_unique(&doc).await?))
    }

    async fn insert_comment(&self, comment: Comment) -> Result<String> {
        let doc = CommentDoc::try_from(comment)?;
        Ok(self.comments.insert_one(&doc).await?.to_hex())
    }

    async fn list_comments(&self, lesson_id: Option<&str>) -> Result<Vec<Comment>> {
        let filter = match lesson_id {
            Some(id) => doc! { "lessonId": id },
            None => doc! {},
        };
        let docs = self.comments.find_many(filter, newest_first()).await?;
        Ok(docs.into_iter().map(Comment::from).collect())
    }
}
