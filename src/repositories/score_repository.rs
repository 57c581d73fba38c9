use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Score};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn create(&self, score: Score) -> AppResult<Score>;
    /// Newest first.
    async fn find_by_student_and_quiz(&self, student_id: &str, quiz_id: &str)
        -> AppResult<Vec<Score>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoScoreRepository {
    collection: Collection<Score>,
}

impl MongoScoreRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("scores");
        Self { collection }
    }
}

#[async_trait]
impl ScoreRepository for MongoScoreRepository {
    async fn create(&self, score: Score) -> AppResult<Score> {
        self.collection.insert_one(&score).await?;
        Ok(score)
    }

    async fn find_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<Score>> {
        let scores = self
            .collection
            .find(doc! {
                "studentId": student_id,
                "quizId": quiz_id
            })
            .sort(doc! { "submittedAt": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(scores)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for scores collection");

        let student_quiz_index = IndexModel::builder()
            .keys(doc! { "studentId": 1, "quizId": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_quiz".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(student_quiz_index).await?;

        log::info!("Successfully created indexes for scores collection");
        Ok(())
    }
}
