use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::Repositories,
    services::{AccessGate, CourseService, ModuleService, PrincipalService, ScoringService},
    storage::{BlobStore, S3BlobStore},
};

#[derive(Clone)]
pub struct AppState {
    pub principal_service: Arc<PrincipalService>,
    pub course_service: Arc<CourseService>,
    pub module_service: Arc<ModuleService>,
    pub scoring_service: Arc<ScoringService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let repositories = Repositories::mongo(&db);
        repositories.ensure_indexes().await?;

        let blobs = Arc::new(S3BlobStore::from_config(&config).await);

        Ok(Self::from_parts(repositories, blobs, config))
    }

    /// Wires the services over any store and blob backend.
    pub fn from_parts(
        repositories: Repositories,
        blobs: Arc<dyn BlobStore>,
        config: Config,
    ) -> Self {
        let principal_service = Arc::new(PrincipalService::new(
            repositories.instructors.clone(),
            repositories.students.clone(),
        ));
        let gate = Arc::new(AccessGate::new(
            repositories.courses.clone(),
            repositories.enrollments.clone(),
        ));

        let course_service = Arc::new(CourseService::new(
            principal_service.clone(),
            gate.clone(),
            repositories.courses.clone(),
            repositories.enrollments.clone(),
        ));
        let module_service = Arc::new(ModuleService::new(
            principal_service.clone(),
            gate.clone(),
            repositories.modules.clone(),
            blobs,
        ));
        let scoring_service = Arc::new(ScoringService::new(
            principal_service.clone(),
            gate,
            repositories.modules.clone(),
            repositories.scores.clone(),
        ));

        Self {
            principal_service,
            course_service,
            module_service,
            scoring_service,
            config: Arc::new(config),
        }
    }
}
