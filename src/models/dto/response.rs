use serde::Serialize;

use crate::models::domain::{Module, ModuleContent, Principal, Quiz, Role, Video};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalDto {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl From<&Principal> for PrincipalDto {
    fn from(principal: &Principal) -> Self {
        PrincipalDto {
            id: principal.id().to_string(),
            email: principal.email().to_string(),
            role: principal.role(),
        }
    }
}

/// A module as shown to a learner: quiz answer keys are removed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerModuleDto {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub is_private: bool,
    #[serde(flatten)]
    pub content: LearnerContentDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LearnerContentDto {
    Video { video: Video },
    Quiz { quiz: LearnerQuizDto },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerQuizDto {
    pub id: String,
    pub num_of_questions: i32,
    pub questions: Vec<LearnerQuestionDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerQuestionDto {
    pub id: String,
    pub content: String,
    pub options: Vec<LearnerOptionDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearnerOptionDto {
    pub id: String,
    pub content: String,
}

impl From<Quiz> for LearnerQuizDto {
    fn from(quiz: Quiz) -> Self {
        LearnerQuizDto {
            id: quiz.id,
            num_of_questions: quiz.num_of_questions,
            questions: quiz
                .questions
                .into_iter()
                .map(|question| LearnerQuestionDto {
                    id: question.id,
                    content: question.content,
                    options: question
                        .options
                        .into_iter()
                        .map(|option| LearnerOptionDto {
                            id: option.id,
                            content: option.content,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl From<Module> for LearnerModuleDto {
    fn from(module: Module) -> Self {
        let content = match module.content {
            ModuleContent::Video { video } => LearnerContentDto::Video { video },
            ModuleContent::Quiz { quiz } => LearnerContentDto::Quiz { quiz: quiz.into() },
        };

        LearnerModuleDto {
            id: module.id,
            course_id: module.course_id,
            title: module.title,
            is_private: module.is_private,
            content,
        }
    }
}

/// Module listing; serializes as a bare JSON array either way.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ModuleListing {
    Full(Vec<Module>),
    Learner(Vec<LearnerModuleDto>),
}

impl ModuleListing {
    pub fn len(&self) -> usize {
        match self {
            ModuleListing::Full(modules) => modules.len(),
            ModuleListing::Learner(modules) => modules.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
