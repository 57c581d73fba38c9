use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Course, Student},
    repositories::{CourseRepository, EnrollmentRepository},
};

/// Ownership and learner gating checks shared by every course-scoped
/// operation.
pub struct AccessGate {
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

fn course_not_found() -> AppError {
    AppError::NotFound("course not found".to_string())
}

impl AccessGate {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            courses,
            enrollments,
        }
    }

    /// Returns the course only when `instructor_email` owns it. A missing
    /// course and someone else's course are indistinguishable to the caller.
    pub async fn owns_course(&self, instructor_email: &str, course_id: &str) -> AppResult<Course> {
        self.courses
            .find_owned(course_id, instructor_email)
            .await?
            .ok_or_else(|| {
                log::warn!(
                    "ownership check failed: '{}' on course '{}'",
                    instructor_email,
                    course_id
                );
                course_not_found()
            })
    }

    pub async fn course_exists(&self, course_id: &str) -> AppResult<bool> {
        Ok(self.courses.find_by_id(course_id).await?.is_some())
    }

    /// False for missing courses as well as unpublished ones.
    pub async fn is_published(&self, course_id: &str) -> AppResult<bool> {
        Ok(self
            .courses
            .find_by_id(course_id)
            .await?
            .map(|c| c.is_published)
            .unwrap_or(false))
    }

    pub async fn is_enrolled(&self, student_id: &str, course_id: &str) -> AppResult<bool> {
        self.enrollments.exists(student_id, course_id).await
    }

    /// Existence then publication.
    pub async fn require_published(&self, course_id: &str) -> AppResult<Course> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(course_not_found)?;

        if !course.is_published {
            log::warn!("course '{}' is not published", course_id);
            return Err(AppError::PolicyViolation("course not published".to_string()));
        }

        Ok(course)
    }

    /// Existence, then publication, then enrollment. The first failing check
    /// decides the error.
    pub async fn authorize_learner(&self, student: &Student, course_id: &str) -> AppResult<Course> {
        let course = self.require_published(course_id).await?;

        if !self.is_enrolled(&student.id, course_id).await? {
            log::warn!(
                "student '{}' is not enrolled in course '{}'",
                student.email,
                course_id
            );
            return Err(AppError::PolicyViolation("student not enrolled".to_string()));
        }

        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        course_repository::MockCourseRepository, enrollment_repository::MockEnrollmentRepository,
    };
    use chrono::Utc;
    use mockall::predicate::eq;

    fn course(published: bool) -> Course {
        let mut course = Course::new("instructor-1", "Rust 101", None);
        if published {
            course.publish(Utc::now());
        }
        course
    }

    fn gate(courses: MockCourseRepository, enrollments: MockEnrollmentRepository) -> AccessGate {
        AccessGate::new(Arc::new(courses), Arc::new(enrollments))
    }

    #[tokio::test]
    async fn test_non_owner_sees_not_found() {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_owned()
            .with(eq("course-1"), eq("mallory@example.com"))
            .returning(|_, _| Ok(None));

        let err = gate(courses, MockEnrollmentRepository::new())
            .owns_course("mallory@example.com", "course-1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref m) if m == "course not found"));
    }

    #[tokio::test]
    async fn test_is_published_is_false_for_missing_course() {
        let mut courses = MockCourseRepository::new();
        courses.expect_find_by_id().returning(|_| Ok(None));

        let gate = gate(courses, MockEnrollmentRepository::new());
        assert!(!gate.is_published("nope").await.unwrap());
        assert!(!gate.course_exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_unpublished_course_short_circuits_enrollment_check() {
        let unpublished = course(false);
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .returning(move |_| Ok(Some(unpublished.clone())));
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_exists().never();

        let student = Student::new("sam@example.com", "hash");
        let err = gate(courses, enrollments)
            .authorize_learner(&student, "course-1")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "course not published");
    }

    #[tokio::test]
    async fn test_missing_course_reported_before_publication() {
        let mut courses = MockCourseRepository::new();
        courses.expect_find_by_id().returning(|_| Ok(None));
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_exists().never();

        let student = Student::new("sam@example.com", "hash");
        let err = gate(courses, enrollments)
            .authorize_learner(&student, "course-1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unenrolled_student_rejected() {
        let published = course(true);
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .returning(move |_| Ok(Some(published.clone())));
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_exists().times(1).returning(|_, _| Ok(false));

        let student = Student::new("sam@example.com", "hash");
        let err = gate(courses, enrollments)
            .authorize_learner(&student, "course-1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PolicyViolation(ref m) if m == "student not enrolled"));
    }

    #[tokio::test]
    async fn test_enrolled_student_passes() {
        let published = course(true);
        let expected_id = published.id.clone();
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .returning(move |_| Ok(Some(published.clone())));
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_exists().returning(|_, _| Ok(true));

        let student = Student::new("sam@example.com", "hash");
        let course = gate(courses, enrollments)
            .authorize_learner(&student, &expected_id)
            .await
            .unwrap();

        assert_eq!(course.id, expected_id);
    }
}
