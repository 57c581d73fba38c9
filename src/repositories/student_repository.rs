use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Student,
    repositories::is_duplicate_key,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, student: Student) -> AppResult<Student>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoStudentRepository {
    collection: Collection<Student>,
}

impl MongoStudentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("students");
        Self { collection }
    }
}

#[async_trait]
impl StudentRepository for MongoStudentRepository {
    async fn create(&self, student: Student) -> AppResult<Student> {
        match self.collection.insert_one(&student).await {
            Ok(_) => Ok(student),
            Err(err) if is_duplicate_key(&err) => Err(AppError::AlreadyExists(format!(
                "student with email '{}' already exists",
                student.email
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>> {
        let student = self.collection.find_one(doc! { "email": email }).await?;
        Ok(student)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder()
            .unique(true)
            .name("email_unique".to_string())
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on students.email");

        Ok(())
    }
}
