use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::dto::request::QuestionRequest;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub module_id: String,
    pub num_of_questions: i32,
    pub questions: Vec<Question>, // insertion order
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub content: String,
    pub options: Vec<QuizOption>, // insertion order
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: String,
    pub question_id: String,
    pub content: String,
    pub is_correct: bool,
}

impl Quiz {
    /// Materializes a quiz tree with fresh identifiers, preserving the
    /// order questions and options were supplied in.
    pub fn from_request(module_id: &str, questions: &[QuestionRequest]) -> Self {
        let quiz_id = Uuid::new_v4().to_string();

        let questions = questions
            .iter()
            .map(|question| {
                let question_id = Uuid::new_v4().to_string();
                let options = question
                    .options
                    .iter()
                    .map(|option| QuizOption {
                        id: Uuid::new_v4().to_string(),
                        question_id: question_id.clone(),
                        content: option.content.clone(),
                        is_correct: option.is_correct,
                    })
                    .collect();

                Question {
                    id: question_id,
                    quiz_id: quiz_id.clone(),
                    content: question.content.clone(),
                    options,
                }
            })
            .collect::<Vec<_>>();

        Quiz {
            id: quiz_id,
            module_id: module_id.to_string(),
            num_of_questions: questions.len() as i32,
            questions,
        }
    }

    pub fn option_count(&self) -> usize {
        self.questions.iter().map(|q| q.options.len()).sum()
    }
}
