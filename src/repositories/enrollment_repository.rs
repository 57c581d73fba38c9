use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Enrollment,
    repositories::is_duplicate_key,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment>;
    async fn exists(&self, student_id: &str, course_id: &str) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoEnrollmentRepository {
    collection: Collection<Enrollment>,
}

impl MongoEnrollmentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("enrollments");
        Self { collection }
    }
}

#[async_trait]
impl EnrollmentRepository for MongoEnrollmentRepository {
    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment> {
        match self.collection.insert_one(&enrollment).await {
            Ok(_) => Ok(enrollment),
            Err(err) if is_duplicate_key(&err) => Err(AppError::AlreadyExists(
                "student already enrolled".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn exists(&self, student_id: &str, course_id: &str) -> AppResult<bool> {
        let enrollment = self
            .collection
            .find_one(doc! {
                "studentId": student_id,
                "courseId": course_id,
            })
            .await?;
        Ok(enrollment.is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "studentId": 1, "courseId": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_course_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on enrollments (studentId, courseId)");

        Ok(())
    }
}
