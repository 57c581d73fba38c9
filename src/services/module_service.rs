use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::{
        domain::{Module, Principal, Quiz},
        dto::{
            request::{CreateQuizModuleRequest, CreateVideoModuleRequest},
            response::{LearnerModuleDto, ModuleListing},
        },
    },
    repositories::ModuleRepository,
    services::{AccessGate, PrincipalService},
    storage::BlobStore,
};

/// Blob key for an uploaded video: `{owner}/{course}/{timestamp}_{filename}`.
pub fn video_storage_key(
    owner_email: &str,
    course_id: &str,
    at: DateTime<Utc>,
    filename: &str,
) -> String {
    format!(
        "{}/{}/{}_{}",
        owner_email,
        course_id,
        at.format("%Y%m%d%H%M%S"),
        filename
    )
}

fn creation_failed(course_id: &str, err: AppError) -> AppError {
    log::error!("module creation for course '{}' rolled back: {}", course_id, err);
    AppError::InternalError("failed to create module".to_string())
}

pub struct ModuleService {
    principals: Arc<PrincipalService>,
    gate: Arc<AccessGate>,
    modules: Arc<dyn ModuleRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl ModuleService {
    pub fn new(
        principals: Arc<PrincipalService>,
        gate: Arc<AccessGate>,
        modules: Arc<dyn ModuleRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            principals,
            gate,
            modules,
            blobs,
        }
    }

    /// Uploads the bytes first, then records the module and its video row
    /// together. If recording fails the uploaded object is left behind.
    pub async fn create_video_module(
        &self,
        claims: &Claims,
        course_id: &str,
        request: CreateVideoModuleRequest,
    ) -> AppResult<Module> {
        request.validate()?;
        let owner = self.principals.instructor_for(claims).await?;
        let course = self.gate.owns_course(&owner.email, course_id).await?;

        if !request.upload.is_video() {
            log::warn!(
                "rejected upload '{}' with content type {:?}",
                request.upload.filename,
                request.upload.content_type
            );
            return Err(AppError::UnsupportedFormat("incorrect file format".to_string()));
        }

        let key = video_storage_key(
            &owner.email,
            &course.id,
            Utc::now(),
            request.upload.base_filename(),
        );
        let content_type = request
            .upload
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");
        let stored_key = self
            .blobs
            .put(&key, content_type, request.upload.bytes.clone())
            .await?;

        let module = Module::new_video(&course.id, &request.title, request.is_private, &stored_key);
        let module = self.modules.create(module).await.map_err(|err| {
            log::warn!("blob '{}' is orphaned", stored_key);
            creation_failed(&course.id, err)
        })?;

        log::info!(
            "{} module '{}' added to course '{}'",
            module.module_type().as_str(),
            module.id,
            course.id
        );
        Ok(module)
    }

    /// Quiz modules are always private.
    pub async fn create_quiz_module(
        &self,
        claims: &Claims,
        course_id: &str,
        request: CreateQuizModuleRequest,
    ) -> AppResult<Module> {
        request.validate()?;
        let owner = self.principals.instructor_for(claims).await?;
        let course = self.gate.owns_course(&owner.email, course_id).await?;

        let module = Module::new_quiz(&course.id, &request.title, |module_id| {
            Quiz::from_request(module_id, &request.questions)
        });
        let module = self
            .modules
            .create(module)
            .await
            .map_err(|err| creation_failed(&course.id, err))?;

        log::info!(
            "{} module '{}' added to course '{}'",
            module.module_type().as_str(),
            module.id,
            course.id
        );
        Ok(module)
    }

    /// The owner gets complete modules. An enrolled student gets the learner
    /// view with answer keys removed.
    pub async fn list_modules(&self, claims: &Claims, course_id: &str) -> AppResult<ModuleListing> {
        match self.principals.resolve(claims).await? {
            Principal::Instructor(instructor) => {
                let course = self.gate.owns_course(&instructor.email, course_id).await?;
                let modules = self.modules.list_by_course(&course.id).await?;
                Ok(ModuleListing::Full(modules))
            }
            Principal::Student(student) => {
                let course = self.gate.authorize_learner(&student, course_id).await?;
                let modules = self.modules.list_by_course(&course.id).await?;
                Ok(ModuleListing::Learner(
                    modules.into_iter().map(LearnerModuleDto::from).collect(),
                ))
            }
        }
    }

    /// Public modules of a published course, for anyone authenticated.
    pub async fn preview_modules(&self, course_id: &str) -> AppResult<Vec<LearnerModuleDto>> {
        let course = self.gate.require_published(course_id).await?;
        let modules = self.modules.list_by_course(&course.id).await?;

        Ok(modules
            .into_iter()
            .filter(|m| !m.is_private)
            .map(LearnerModuleDto::from)
            .collect())
    }
}
