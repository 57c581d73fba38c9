//! A process-local store implementing every repository trait. Composite
//! writes are staged and applied under one lock, so they are all-or-nothing
//! just like the MongoDB transaction path. Write failures can be injected
//! to exercise rollback behavior.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Course, Enrollment, Instructor, Module, ModuleType, Score, Student, Video},
    repositories::{
        records::{
            assemble_quiz, assemble_video, ModuleRecord, ModuleRows, OptionRecord, PayloadRows,
            QuestionRecord, QuizRecord,
        },
        CourseRepository, EnrollmentRepository, InstructorRepository, ModuleRepository,
        ScoreRepository, StudentRepository,
    },
};

#[derive(Default)]
struct Tables {
    instructors: Vec<Instructor>,
    students: Vec<Student>,
    courses: Vec<Course>,
    enrollments: Vec<Enrollment>,
    modules: Vec<ModuleRecord>,
    videos: Vec<Video>,
    quizzes: Vec<QuizRecord>,
    questions: Vec<QuestionRecord>,
    options: Vec<OptionRecord>,
    scores: Vec<Score>,
    write_budget: Option<usize>,
}

impl Tables {
    /// Reserves `rows` writes against the injected budget.
    fn charge(&mut self, rows: usize) -> AppResult<()> {
        if let Some(budget) = self.write_budget {
            if rows > budget {
                self.write_budget = Some(0);
                return Err(AppError::DatabaseError(format!(
                    "write failed after {} of {} rows",
                    budget, rows
                )));
            }
            self.write_budget = Some(budget - rows);
        }
        Ok(())
    }

    fn hydrate(&self, record: &ModuleRecord) -> AppResult<Module> {
        let missing = |kind: &str| {
            AppError::InternalError(format!("module '{}' has no {} row", record.id, kind))
        };

        match record.module_type {
            ModuleType::Video => {
                let video = self
                    .videos
                    .iter()
                    .find(|v| v.module_id == record.id)
                    .cloned()
                    .ok_or_else(|| missing("video"))?;
                Ok(assemble_video(record.clone(), video))
            }
            ModuleType::Quiz => {
                let quiz = self
                    .quizzes
                    .iter()
                    .find(|q| q.module_id == record.id)
                    .cloned()
                    .ok_or_else(|| missing("quiz"))?;
                let questions: Vec<QuestionRecord> = self
                    .questions
                    .iter()
                    .filter(|q| q.quiz_id == quiz.id)
                    .cloned()
                    .collect();
                let options = self
                    .options
                    .iter()
                    .filter(|o| questions.iter().any(|q| q.id == o.question_id))
                    .cloned()
                    .collect();
                Ok(assemble_quiz(record.clone(), quiz, questions, options))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub courses: usize,
    pub enrollments: usize,
    pub modules: usize,
    pub videos: usize,
    pub quizzes: usize,
    pub questions: usize,
    pub options: usize,
    pub scores: usize,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets `rows` more rows be written, then fails every write.
    pub async fn fail_writes_after(&self, rows: usize) {
        self.tables.write().await.write_budget = Some(rows);
    }

    pub async fn clear_write_failures(&self) {
        self.tables.write().await.write_budget = None;
    }

    pub async fn row_counts(&self) -> RowCounts {
        let tables = self.tables.read().await;
        RowCounts {
            courses: tables.courses.len(),
            enrollments: tables.enrollments.len(),
            modules: tables.modules.len(),
            videos: tables.videos.len(),
            quizzes: tables.quizzes.len(),
            questions: tables.questions.len(),
            options: tables.options.len(),
            scores: tables.scores.len(),
        }
    }
}

#[async_trait]
impl InstructorRepository for InMemoryStore {
    async fn create(&self, instructor: Instructor) -> AppResult<Instructor> {
        let mut tables = self.tables.write().await;
        if tables.instructors.iter().any(|i| i.email == instructor.email) {
            return Err(AppError::AlreadyExists(format!(
                "instructor with email '{}' already exists",
                instructor.email
            )));
        }
        tables.charge(1)?;
        tables.instructors.push(instructor.clone());
        Ok(instructor)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Instructor>> {
        let tables = self.tables.read().await;
        Ok(tables.instructors.iter().find(|i| i.email == email).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn create(&self, student: Student) -> AppResult<Student> {
        let mut tables = self.tables.write().await;
        if tables.students.iter().any(|s| s.email == student.email) {
            return Err(AppError::AlreadyExists(format!(
                "student with email '{}' already exists",
                student.email
            )));
        }
        tables.charge(1)?;
        tables.students.push(student.clone());
        Ok(student)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>> {
        let tables = self.tables.read().await;
        Ok(tables.students.iter().find(|s| s.email == email).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn create(&self, course: Course) -> AppResult<Course> {
        let mut tables = self.tables.write().await;
        tables.charge(1)?;
        tables.courses.push(course.clone());
        Ok(course)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        let tables = self.tables.read().await;
        Ok(tables.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn find_owned(&self, id: &str, instructor_email: &str) -> AppResult<Option<Course>> {
        let tables = self.tables.read().await;
        let Some(owner) = tables.instructors.iter().find(|i| i.email == instructor_email) else {
            return Ok(None);
        };
        Ok(tables
            .courses
            .iter()
            .find(|c| c.id == id && c.instructor_id == owner.id)
            .cloned())
    }

    async fn update(&self, course: Course) -> AppResult<Course> {
        let mut tables = self.tables.write().await;
        let index = tables
            .courses
            .iter()
            .position(|c| c.id == course.id)
            .ok_or_else(|| AppError::NotFound("course not found".to_string()))?;
        tables.charge(1)?;
        tables.courses[index] = course.clone();
        Ok(course)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .enrollments
            .iter()
            .any(|e| e.student_id == enrollment.student_id && e.course_id == enrollment.course_id);
        if duplicate {
            return Err(AppError::AlreadyExists("student already enrolled".to_string()));
        }
        tables.charge(1)?;
        tables.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn exists(&self, student_id: &str, course_id: &str) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .any(|e| e.student_id == student_id && e.course_id == course_id))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ModuleRepository for InMemoryStore {
    async fn create(&self, module: Module) -> AppResult<Module> {
        let rows = ModuleRows::from(&module);
        let mut tables = self.tables.write().await;

        tables.charge(rows.row_count())?;

        tables.modules.push(rows.module);
        match rows.payload {
            PayloadRows::Video(video) => tables.videos.push(video),
            PayloadRows::Quiz {
                quiz,
                questions,
                options,
            } => {
                tables.quizzes.push(quiz);
                tables.questions.extend(questions);
                tables.options.extend(options);
            }
        }

        Ok(module)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Module>> {
        let tables = self.tables.read().await;
        tables
            .modules
            .iter()
            .find(|m| m.id == id)
            .map(|record| tables.hydrate(record))
            .transpose()
    }

    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<Module>> {
        let tables = self.tables.read().await;
        tables
            .modules
            .iter()
            .filter(|m| m.course_id == course_id)
            .map(|record| tables.hydrate(record))
            .collect()
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ScoreRepository for InMemoryStore {
    async fn create(&self, score: Score) -> AppResult<Score> {
        let mut tables = self.tables.write().await;
        tables.charge(1)?;
        tables.scores.push(score.clone());
        Ok(score)
    }

    async fn find_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<Score>> {
        let tables = self.tables.read().await;
        let mut items: Vec<Score> = tables
            .scores
            .iter()
            .rev()
            .filter(|s| s.student_id == student_id && s.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(items)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}
