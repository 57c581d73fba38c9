use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz::Quiz;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Video,
    Quiz,
}

impl ModuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Video => "video",
            ModuleType::Quiz => "quiz",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub module_id: String,
    pub key: String, // blob store handle
}

/// The type-specific payload. The variant is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModuleContent {
    Video { video: Video },
    Quiz { quiz: Quiz },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub content: ModuleContent,
}

impl Module {
    pub fn new_video(course_id: &str, title: &str, is_private: bool, key: &str) -> Self {
        let module_id = Uuid::new_v4().to_string();
        let video = Video {
            id: Uuid::new_v4().to_string(),
            module_id: module_id.clone(),
            key: key.to_string(),
        };

        Module {
            id: module_id,
            course_id: course_id.to_string(),
            title: title.to_string(),
            is_private,
            created_at: Utc::now(),
            content: ModuleContent::Video { video },
        }
    }

    /// Quizzes are always private.
    pub fn new_quiz(course_id: &str, title: &str, build: impl FnOnce(&str) -> Quiz) -> Self {
        let module_id = Uuid::new_v4().to_string();
        let quiz = build(&module_id);

        Module {
            id: module_id,
            course_id: course_id.to_string(),
            title: title.to_string(),
            is_private: true,
            created_at: Utc::now(),
            content: ModuleContent::Quiz { quiz },
        }
    }

    pub fn module_type(&self) -> ModuleType {
        match self.content {
            ModuleContent::Video { .. } => ModuleType::Video,
            ModuleContent::Quiz { .. } => ModuleType::Quiz,
        }
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        match &self.content {
            ModuleContent::Quiz { quiz } => Some(quiz),
            ModuleContent::Video { .. } => None,
        }
    }
}
