#[cfg(test)]
pub mod fixtures {
    use std::sync::Arc;

    use bytes::Bytes;
    use chrono::Utc;

    use crate::{
        auth::Claims,
        models::{
            domain::{Course, Enrollment, Instructor, Role, Student},
            dto::request::{
                CreateQuizModuleRequest, CreateVideoModuleRequest, OptionRequest, QuestionRequest,
                VideoUpload,
            },
        },
        repositories::{InMemoryStore, Repositories},
        services::{AccessGate, ModuleService, PrincipalService, ScoringService},
        storage::InMemoryBlobStore,
    };

    /// In-memory store and blob store with the shared services wired over them.
    pub struct TestContext {
        pub store: Arc<InMemoryStore>,
        pub blobs: Arc<InMemoryBlobStore>,
        pub repos: Repositories,
        pub principals: Arc<PrincipalService>,
        pub gate: Arc<AccessGate>,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let store = Arc::new(InMemoryStore::new());
            let repos = Repositories::in_memory(store.clone());
            let principals = Arc::new(PrincipalService::new(
                repos.instructors.clone(),
                repos.students.clone(),
            ));
            let gate = Arc::new(AccessGate::new(
                repos.courses.clone(),
                repos.enrollments.clone(),
            ));

            Self {
                store,
                blobs: Arc::new(InMemoryBlobStore::new()),
                repos,
                principals,
                gate,
            }
        }

        pub fn module_service(&self) -> ModuleService {
            ModuleService::new(
                self.principals.clone(),
                self.gate.clone(),
                self.repos.modules.clone(),
                self.blobs.clone(),
            )
        }

        pub fn scoring_service(&self) -> ScoringService {
            ScoringService::new(
                self.principals.clone(),
                self.gate.clone(),
                self.repos.modules.clone(),
                self.repos.scores.clone(),
            )
        }

        pub async fn instructor(&self, email: &str) -> Instructor {
            self.repos
                .instructors
                .create(Instructor::new(email, "hash"))
                .await
                .unwrap()
        }

        pub async fn student(&self, email: &str) -> Student {
            self.repos
                .students
                .create(Student::new(email, "hash"))
                .await
                .unwrap()
        }

        pub async fn course(&self, owner: &Instructor, published: bool) -> Course {
            let mut course = Course::new(&owner.id, "Rust 101", None);
            if published {
                course.publish(Utc::now());
            }
            self.repos.courses.create(course).await.unwrap()
        }

        pub async fn publish(&self, course: &Course) -> Course {
            let mut course = course.clone();
            course.publish(Utc::now());
            self.repos.courses.update(course).await.unwrap()
        }

        pub async fn enroll(&self, student: &Student, course: &Course) -> Enrollment {
            self.repos
                .enrollments
                .create(Enrollment::new(&student.id, &course.id))
                .await
                .unwrap()
        }
    }

    pub fn instructor_claims(email: &str) -> Claims {
        Claims::new(email, Role::Instructor, 1)
    }

    pub fn student_claims(email: &str) -> Claims {
        Claims::new(email, Role::Student, 1)
    }

    /// Builds a quiz request from `(question, [(option, is_correct)])` pairs.
    pub fn quiz_request(
        title: &str,
        questions: &[(&str, &[(&str, bool)])],
    ) -> CreateQuizModuleRequest {
        CreateQuizModuleRequest {
            title: title.to_string(),
            questions: questions
                .iter()
                .map(|(content, options)| QuestionRequest {
                    content: content.to_string(),
                    options: options
                        .iter()
                        .map(|(content, is_correct)| OptionRequest {
                            content: content.to_string(),
                            is_correct: *is_correct,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn video_request(
        title: &str,
        is_private: bool,
        filename: &str,
        content_type: &str,
    ) -> CreateVideoModuleRequest {
        CreateVideoModuleRequest {
            title: title.to_string(),
            is_private,
            upload: VideoUpload {
                filename: filename.to_string(),
                content_type: Some(content_type.to_string()),
                bytes: Bytes::from_static(b"\x00\x00\x00\x18ftypmp42"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[tokio::test]
    async fn test_context_starts_empty() {
        let ctx = TestContext::new().await;
        let counts = ctx.store.row_counts().await;
        assert_eq!(counts.courses, 0);
        assert!(ctx.blobs.is_empty().await);
    }

    #[test]
    fn test_claims_carry_role() {
        let claims = instructor_claims("ada@example.com");
        assert_eq!(claims.role, crate::models::domain::Role::Instructor);
        assert_eq!(student_claims("sam@example.com").email(), "sam@example.com");
    }

    #[test]
    fn test_quiz_request_preserves_order() {
        let request = quiz_request(
            "Q",
            &[("first", &[("a", true), ("b", false)]), ("second", &[("c", false)])],
        );
        assert_eq!(request.questions[0].content, "first");
        assert_eq!(request.questions[0].options[1].content, "b");
        assert_eq!(request.questions[1].options.len(), 1);
    }
}
