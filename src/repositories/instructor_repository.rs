use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Instructor,
    repositories::is_duplicate_key,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstructorRepository: Send + Sync {
    async fn create(&self, instructor: Instructor) -> AppResult<Instructor>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Instructor>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoInstructorRepository {
    collection: Collection<Instructor>,
}

impl MongoInstructorRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("instructors");
        Self { collection }
    }
}

#[async_trait]
impl InstructorRepository for MongoInstructorRepository {
    async fn create(&self, instructor: Instructor) -> AppResult<Instructor> {
        match self.collection.insert_one(&instructor).await {
            Ok(_) => Ok(instructor),
            Err(err) if is_duplicate_key(&err) => Err(AppError::AlreadyExists(format!(
                "instructor with email '{}' already exists",
                instructor.email
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Instructor>> {
        let instructor = self.collection.find_one(doc! { "email": email }).await?;
        Ok(instructor)
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
        log::info!("Created unique index on instructors.email");

        Ok(())
    }
}
