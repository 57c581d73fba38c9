pub mod course_repository;
pub mod enrollment_repository;
pub mod instructor_repository;
pub mod memory;
pub mod module_repository;
pub mod records;
pub mod score_repository;
pub mod student_repository;

use std::sync::Arc;

use mongodb::error::{ErrorKind, WriteFailure};

pub use course_repository::{CourseRepository, MongoCourseRepository};
pub use enrollment_repository::{EnrollmentRepository, MongoEnrollmentRepository};
pub use instructor_repository::{InstructorRepository, MongoInstructorRepository};
pub use memory::InMemoryStore;
pub use module_repository::{ModuleRepository, MongoModuleRepository};
pub use score_repository::{MongoScoreRepository, ScoreRepository};
pub use student_repository::{MongoStudentRepository, StudentRepository};

use crate::{db::Database, errors::AppResult};

/// Every store handle the services need, injected as one bundle.
#[derive(Clone)]
pub struct Repositories {
    pub instructors: Arc<dyn InstructorRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub modules: Arc<dyn ModuleRepository>,
    pub scores: Arc<dyn ScoreRepository>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Self {
            instructors: Arc::new(MongoInstructorRepository::new(db)),
            students: Arc::new(MongoStudentRepository::new(db)),
            courses: Arc::new(MongoCourseRepository::new(db)),
            enrollments: Arc::new(MongoEnrollmentRepository::new(db)),
            modules: Arc::new(MongoModuleRepository::new(db)),
            scores: Arc::new(MongoScoreRepository::new(db)),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            instructors: store.clone(),
            students: store.clone(),
            courses: store.clone(),
            enrollments: store.clone(),
            modules: store.clone(),
            scores: store,
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.instructors.ensure_indexes().await?;
        self.students.ensure_indexes().await?;
        self.courses.ensure_indexes().await?;
        self.enrollments.ensure_indexes().await?;
        self.modules.ensure_indexes().await?;
        self.scores.ensure_indexes().await?;
        Ok(())
    }
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}
