use bytes::Bytes;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescriptionRequest {
    #[validate(length(max = 5000))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OptionRequest {
    #[validate(length(min = 1))]
    pub content: String,

    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    #[validate(length(min = 1))]
    pub content: String,

    #[validate(length(min = 1), nested)]
    pub options: Vec<OptionRequest>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizModuleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1), nested)]
    pub questions: Vec<QuestionRequest>,
}

/// An uploaded file as declared by the client.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl VideoUpload {
    /// True when the declared MIME top-level type is `video`.
    pub fn is_video(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.parse::<mime::Mime>().ok())
            .map(|m| m.type_() == mime::VIDEO)
            .unwrap_or(false)
    }

    /// The last path segment of the client filename.
    pub fn base_filename(&self) -> &str {
        self.filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filename)
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CreateVideoModuleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub is_private: bool,

    pub upload: VideoUpload,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1))]
    pub module_id: String,

    /// Chosen option identifiers. Repeats are scored as given.
    pub response: Vec<String>,
}
