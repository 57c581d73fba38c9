use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    ClientSession, Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Module, ModuleType, Video},
    repositories::records::{
        assemble_quiz, assemble_video, ModuleRecord, ModuleRows, OptionRecord, PayloadRows,
        QuestionRecord, QuizRecord,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    /// Persists the module row and every child row of its payload as one
    /// unit. On error nothing from `module` is visible.
    async fn create(&self, module: Module) -> AppResult<Module>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Module>>;
    /// Modules of a course in creation order.
    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<Module>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoModuleRepository {
    db: Database,
    modules: Collection<ModuleRecord>,
    videos: Collection<Video>,
    quizzes: Collection<QuizRecord>,
    questions: Collection<QuestionRecord>,
    options: Collection<OptionRecord>,
}

impl MongoModuleRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            modules: db.get_collection("modules"),
            videos: db.get_collection("videos"),
            quizzes: db.get_collection("quizzes"),
            questions: db.get_collection("questions"),
            options: db.get_collection("options"),
        }
    }

    async fn insert_rows(&self, rows: &ModuleRows, session: &mut ClientSession) -> AppResult<()> {
        self.modules
            .insert_one(&rows.module)
            .session(&mut *session)
            .await?;

        match &rows.payload {
            PayloadRows::Video(video) => {
                self.videos.insert_one(video).session(&mut *session).await?;
            }
            PayloadRows::Quiz {
                quiz,
                questions,
                options,
            } => {
                self.quizzes.insert_one(quiz).session(&mut *session).await?;

                for question in questions {
                    self.questions
                        .insert_one(question)
                        .session(&mut *session)
                        .await?;

                    for option in options.iter().filter(|o| o.question_id == question.id) {
                        self.options
                            .insert_one(option)
                            .session(&mut *session)
                            .await?;
                    }
                }
            }
        }

        Ok(())
    }

    async fn hydrate(&self, record: ModuleRecord) -> AppResult<Module> {
        match record.module_type {
            ModuleType::Video => {
                let video = self
                    .videos
                    .find_one(doc! { "moduleId": record.id.as_str() })
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(format!("module '{}' has no video row", record.id))
                    })?;

                Ok(assemble_video(record, video))
            }
            ModuleType::Quiz => {
                let quiz = self
                    .quizzes
                    .find_one(doc! { "moduleId": record.id.as_str() })
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(format!("module '{}' has no quiz row", record.id))
                    })?;

                let questions: Vec<QuestionRecord> = self
                    .questions
                    .find(doc! { "quizId": quiz.id.as_str() })
                    .await?
                    .try_collect()
                    .await?;

                let question_ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
                let options: Vec<OptionRecord> = self
                    .options
                    .find(doc! { "questionId": { "$in": question_ids } })
                    .await?
                    .try_collect()
                    .await?;

                Ok(assemble_quiz(record, quiz, questions, options))
            }
        }
    }
}

#[async_trait]
impl ModuleRepository for MongoModuleRepository {
    async fn create(&self, module: Module) -> AppResult<Module> {
        let rows = ModuleRows::from(&module);
        let mut session = self.db.start_transaction().await?;

        if let Err(err) = self.insert_rows(&rows, &mut session).await {
            if let Err(abort_err) = session.abort_transaction().await {
                log::error!(
                    "Failed to abort transaction for module '{}': {}",
                    module.id,
                    abort_err
                );
            }
            return Err(err);
        }

        session.commit_transaction().await?;
        log::debug!("Committed {} rows for module '{}'", rows.row_count(), module.id);

        Ok(module)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Module>> {
        match self.modules.find_one(doc! { "id": id }).await? {
            Some(record) => Ok(Some(self.hydrate(record).await?)),
            None => Ok(None),
        }
    }

    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<Module>> {
        let records: Vec<ModuleRecord> = self
            .modules
            .find(doc! { "courseId": course_id })
            .sort(doc! { "createdAt": 1 })
            .await?
            .try_collect()
            .await?;

        let mut modules = Vec::with_capacity(records.len());
        for record in records {
            modules.push(self.hydrate(record).await?);
        }

        Ok(modules)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for module collections");

        let unique_id = || {
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("id_unique".to_string())
                        .build(),
                )
                .build()
        };
        let by = |field: &str| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(field.to_string()).build())
                .build()
        };

        self.modules.create_index(unique_id()).await?;
        self.modules.create_index(by("courseId")).await?;
        self.videos.create_index(by("moduleId")).await?;
        self.quizzes.create_index(unique_id()).await?;
        self.quizzes.create_index(by("moduleId")).await?;
        self.questions.create_index(unique_id()).await?;
        self.questions.create_index(by("quizId")).await?;
        self.options.create_index(unique_id()).await?;
        self.options.create_index(by("questionId")).await?;

        log::info!("Successfully created indexes for module collections");
        Ok(())
    }
}
