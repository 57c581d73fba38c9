use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Course,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: Course) -> AppResult<Course>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>>;
    /// The course with `id`, provided its owning instructor has `instructor_email`.
    async fn find_owned(&self, id: &str, instructor_email: &str) -> AppResult<Option<Course>>;
    async fn update(&self, course: Course) -> AppResult<Course>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoCourseRepository {
    collection: Collection<Course>,
}

impl MongoCourseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("courses");
        Self { collection }
    }
}

#[async_trait]
impl CourseRepository for MongoCourseRepository {
    async fn create(&self, course: Course) -> AppResult<Course> {
        self.collection.insert_one(&course).await?;
        Ok(course)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        let course = self.collection.find_one(doc! { "id": id }).await?;
        Ok(course)
    }

    async fn find_owned(&self, id: &str, instructor_email: &str) -> AppResult<Option<Course>> {
        let pipeline = vec![
            doc! { "$match": { "id": id } },
            doc! { "$lookup": {
                "from": "instructors",
                "localField": "instructorId",
                "foreignField": "id",
                "as": "owner",
            } },
            doc! { "$match": { "owner.email": instructor_email } },
            doc! { "$project": { "owner": 0 } },
            doc! { "$limit": 1 },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        match cursor.try_next().await? {
            Some(document) => Ok(Some(bson::from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, course: Course) -> AppResult<Course> {
        let result = self
            .collection
            .replace_one(doc! { "id": &course.id }, &course)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("course not found".to_string()));
        }

        Ok(course)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for courses collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let instructor_index = IndexModel::builder()
            .keys(doc! { "instructorId": 1 })
            .options(
                IndexOptions::builder()
                    .name("instructor_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(instructor_index).await?;

        log::info!("Successfully created indexes for courses collection");
        Ok(())
    }
}
