use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{hash_password, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{Instructor, Principal, Role, Student},
        dto::request::RegisterRequest,
    },
    repositories::{InstructorRepository, StudentRepository},
};

/// Maps a verified token subject onto a registered account.
pub struct PrincipalService {
    instructors: Arc<dyn InstructorRepository>,
    students: Arc<dyn StudentRepository>,
}

impl PrincipalService {
    pub fn new(
        instructors: Arc<dyn InstructorRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            instructors,
            students,
        }
    }

    /// Creates an account in the table for `role`. Emails are unique per role.
    pub async fn register(&self, role: Role, request: RegisterRequest) -> AppResult<Principal> {
        request.validate()?;
        let password_hash = hash_password(&request.password);

        let principal = match role {
            Role::Instructor => self
                .instructors
                .create(Instructor::new(&request.email, &password_hash))
                .await
                .map(Principal::Instructor)?,
            Role::Student => self
                .students
                .create(Student::new(&request.email, &password_hash))
                .await
                .map(Principal::Student)?,
        };

        log::info!("registered {:?} account '{}'", role, principal.email());
        Ok(principal)
    }

    /// Looks the subject up in the table named by the role claim.
    pub async fn resolve(&self, claims: &Claims) -> AppResult<Principal> {
        match claims.role {
            Role::Instructor => self
                .require_instructor(claims.email())
                .await
                .map(Principal::Instructor),
            Role::Student => self
                .require_student(claims.email())
                .await
                .map(Principal::Student),
        }
    }

    /// The instructor behind `claims`. A student token is refused even when
    /// its email also belongs to an instructor.
    pub async fn instructor_for(&self, claims: &Claims) -> AppResult<Instructor> {
        match self.resolve(claims).await? {
            Principal::Instructor(instructor) => Ok(instructor),
            Principal::Student(student) => {
                log::warn!("student '{}' attempted an instructor action", student.email);
                Err(AppError::Unauthorized("instructor role required".to_string()))
            }
        }
    }

    pub async fn student_for(&self, claims: &Claims) -> AppResult<Student> {
        match self.resolve(claims).await? {
            Principal::Student(student) => Ok(student),
            Principal::Instructor(instructor) => {
                log::warn!("instructor '{}' attempted a student action", instructor.email);
                Err(AppError::Unauthorized("student role required".to_string()))
            }
        }
    }

    pub async fn require_instructor(&self, email: &str) -> AppResult<Instructor> {
        self.instructors.find_by_email(email).await?.ok_or_else(|| {
            log::warn!("no instructor account for '{}'", email);
            AppError::Unauthorized("instructor account not found".to_string())
        })
    }

    pub async fn require_student(&self, email: &str) -> AppResult<Student> {
        self.students.find_by_email(email).await?.ok_or_else(|| {
            log::warn!("no student account for '{}'", email);
            AppError::Unauthorized("student account not found".to_string())
        })
    }
}
