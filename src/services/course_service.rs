use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::{
        domain::{Course, Enrollment, Principal},
        dto::request::{CreateCourseRequest, UpdateDescriptionRequest},
    },
    repositories::{CourseRepository, EnrollmentRepository},
    services::{AccessGate, PrincipalService},
};

pub struct CourseService {
    principals: Arc<PrincipalService>,
    gate: Arc<AccessGate>,
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl CourseService {
    pub fn new(
        principals: Arc<PrincipalService>,
        gate: Arc<AccessGate>,
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            principals,
            gate,
            courses,
            enrollments,
        }
    }

    pub async fn create_course(
        &self,
        claims: &Claims,
        request: CreateCourseRequest,
    ) -> AppResult<Course> {
        request.validate()?;
        let instructor = self.principals.instructor_for(claims).await?;

        let course = Course::new(&instructor.id, &request.title, request.description);
        let course = self.courses.create(course).await?;

        log::info!("instructor '{}' created course '{}'", instructor.email, course.id);
        Ok(course)
    }

    /// Owners see their course in any state. Students only see published ones.
    pub async fn get_course(&self, claims: &Claims, course_id: &str) -> AppResult<Course> {
        match self.principals.resolve(claims).await? {
            Principal::Instructor(instructor) => {
                self.gate.owns_course(&instructor.email, course_id).await
            }
            Principal::Student(_) => self.gate.require_published(course_id).await,
        }
    }

    pub async fn update_description(
        &self,
        claims: &Claims,
        course_id: &str,
        request: UpdateDescriptionRequest,
    ) -> AppResult<Course> {
        request.validate()?;
        let instructor = self.principals.instructor_for(claims).await?;
        let mut course = self.gate.owns_course(&instructor.email, course_id).await?;

        course.description = Some(request.description);
        self.courses.update(course).await
    }

    /// Publishing twice is a no-op that keeps the first publication time.
    pub async fn publish_course(&self, claims: &Claims, course_id: &str) -> AppResult<Course> {
        let instructor = self.principals.instructor_for(claims).await?;
        let mut course = self.gate.owns_course(&instructor.email, course_id).await?;
        if course.is_published {
            return Ok(course);
        }

        course.publish(Utc::now());
        let course = self.courses.update(course).await?;

        log::info!("course '{}' published", course.id);
        Ok(course)
    }

    pub async fn enroll(&self, claims: &Claims, course_id: &str) -> AppResult<Enrollment> {
        let student = self.principals.student_for(claims).await?;
        let course = self.gate.require_published(course_id).await?;

        if self.gate.is_enrolled(&student.id, &course.id).await? {
            return Err(AppError::AlreadyExists("student already enrolled".to_string()));
        }

        let enrollment = self
            .enrollments
            .create(Enrollment::new(&student.id, &course.id))
            .await?;

        log::info!("student '{}' enrolled in course '{}'", student.email, course.id);
        Ok(enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{Instructor, Role, Student},
        repositories::{InMemoryStore, Repositories},
        test_utils::fixtures::{instructor_claims, student_claims},
    };

    struct Fixture {
        repos: Repositories,
        service: CourseService,
        instructor: Instructor,
        student: Student,
    }

    async fn fixture() -> Fixture {
        let repos = Repositories::in_memory(Arc::new(InMemoryStore::new()));
        let instructor = repos
            .instructors
            .create(Instructor::new("ada@example.com", "hash"))
            .await
            .unwrap();
        let student = repos
            .students
            .create(Student::new("sam@example.com", "hash"))
            .await
            .unwrap();

        let principals = Arc::new(PrincipalService::new(
            repos.instructors.clone(),
            repos.students.clone(),
        ));
        let gate = Arc::new(AccessGate::new(
            repos.courses.clone(),
            repos.enrollments.clone(),
        ));
        let service = CourseService::new(
            principals,
            gate,
            repos.courses.clone(),
            repos.enrollments.clone(),
        );

        Fixture {
            repos,
            service,
            instructor,
            student,
        }
    }

    fn create_request(title: &str) -> CreateCourseRequest {
        CreateCourseRequest {
            title: title.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_course_belongs_to_instructor() {
        let f = fixture().await;
        let course = f
            .service
            .create_course(&instructor_claims("ada@example.com"), create_request("Rust 101"))
            .await
            .unwrap();

        assert_eq!(course.instructor_id, f.instructor.id);
        assert!(!course.is_published);
        assert!(f.repos.courses.find_by_id(&course.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_course_rejects_blank_title() {
        let f = fixture().await;
        let err = f
            .service
            .create_course(&instructor_claims("ada@example.com"), create_request(""))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_student_cannot_create_course() {
        let f = fixture().await;
        let err = f
            .service
            .create_course(&student_claims("sam@example.com"), create_request("Sneaky"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_publish_keeps_first_timestamp() {
        let f = fixture().await;
        let course = f
            .service
            .create_course(&instructor_claims("ada@example.com"), create_request("Rust 101"))
            .await
            .unwrap();

        let ada = instructor_claims("ada@example.com");
        let first = f.service.publish_course(&ada, &course.id).await.unwrap();
        let second = f.service.publish_course(&ada, &course.id).await.unwrap();

        assert!(first.is_published);
        assert_eq!(first.published_at, second.published_at);
    }

    #[tokio::test]
    async fn test_update_description_requires_ownership() {
        let f = fixture().await;
        f.repos
            .instructors
            .create(Instructor::new("eve@example.com", "hash"))
            .await
            .unwrap();
        let course = f
            .service
            .create_course(&instructor_claims("ada@example.com"), create_request("Rust 101"))
            .await
            .unwrap();

        let request = UpdateDescriptionRequest {
            description: "Ownership and borrowing".to_string(),
        };
        let err = f
            .service
            .update_description(&instructor_claims("eve@example.com"), &course.id, request.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let updated = f
            .service
            .update_description(&instructor_claims("ada@example.com"), &course.id, request)
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Ownership and borrowing"));
    }

    #[tokio::test]
    async fn test_enroll_requires_published_course() {
        let f = fixture().await;
        let course = f
            .service
            .create_course(&instructor_claims("ada@example.com"), create_request("Rust 101"))
            .await
            .unwrap();

        let sam = student_claims("sam@example.com");
        let err = f.service.enroll(&sam, &course.id).await.unwrap_err();
        assert!(matches!(err, AppError::PolicyViolation(_)));

        let ada = instructor_claims("ada@example.com");
        f.service.publish_course(&ada, &course.id).await.unwrap();
        let enrollment = f.service.enroll(&sam, &course.id).await.unwrap();
        assert_eq!(enrollment.student_id, f.student.id);

        let err = f.service.enroll(&sam, &course.id).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_instructor_token_cannot_enroll() {
        let f = fixture().await;
        let ada = instructor_claims("ada@example.com");
        let course = f
            .service
            .create_course(&ada, create_request("Rust 101"))
            .await
            .unwrap();
        f.service.publish_course(&ada, &course.id).await.unwrap();

        let err = f.service.enroll(&ada, &course.id).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_enroll_unknown_course() {
        let f = fixture().await;
        let sam = student_claims("sam@example.com");
        let err = f.service.enroll(&sam, "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_course_visibility() {
        let f = fixture().await;
        let course = f
            .service
            .create_course(&instructor_claims("ada@example.com"), create_request("Rust 101"))
            .await
            .unwrap();
        let owner = Claims::new("ada@example.com", Role::Instructor, 1);
        let learner = Claims::new("sam@example.com", Role::Student, 1);

        assert!(f.service.get_course(&owner, &course.id).await.is_ok());
        assert!(f.service.get_course(&learner, &course.id).await.is_err());

        f.service.publish_course(&owner, &course.id).await.unwrap();
        let seen = f.service.get_course(&learner, &course.id).await.unwrap();
        assert_eq!(seen.id, course.id);
    }
}
