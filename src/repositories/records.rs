//! Row shapes for the module tree. A [`Module`] is stored as one module row
//! plus the child rows of its variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{
    Module, ModuleContent, ModuleType, Question, Quiz, QuizOption, Video,
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    pub id: String,
    pub module_id: String,
    pub num_of_questions: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub quiz_id: String,
    pub content: String,
    pub position: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRecord {
    pub id: String,
    pub question_id: String,
    pub content: String,
    pub is_correct: bool,
    pub position: i32,
}

#[derive(Clone, Debug)]
pub enum PayloadRows {
    Video(Video),
    Quiz {
        quiz: QuizRecord,
        questions: Vec<QuestionRecord>,
        options: Vec<OptionRecord>,
    },
}

/// Every row a module writes, parent first.
#[derive(Clone, Debug)]
pub struct ModuleRows {
    pub module: ModuleRecord,
    pub payload: PayloadRows,
}

impl ModuleRows {
    pub fn row_count(&self) -> usize {
        1 + match &self.payload {
            PayloadRows::Video(_) => 1,
            PayloadRows::Quiz { questions, options, .. } => 1 + questions.len() + options.len(),
        }
    }
}

impl From<&Module> for ModuleRows {
    fn from(module: &Module) -> Self {
        let record = ModuleRecord {
            id: module.id.clone(),
            course_id: module.course_id.clone(),
            title: module.title.clone(),
            module_type: module.module_type(),
            is_private: module.is_private,
            created_at: module.created_at,
        };

        let payload = match &module.content {
            ModuleContent::Video { video } => PayloadRows::Video(video.clone()),
            ModuleContent::Quiz { quiz } => {
                let mut questions = Vec::with_capacity(quiz.questions.len());
                let mut options = Vec::with_capacity(quiz.option_count());

                for (q_pos, question) in quiz.questions.iter().enumerate() {
                    questions.push(QuestionRecord {
                        id: question.id.clone(),
                        quiz_id: quiz.id.clone(),
                        content: question.content.clone(),
                        position: q_pos as i32,
                    });
                    for (o_pos, option) in question.options.iter().enumerate() {
                        options.push(OptionRecord {
                            id: option.id.clone(),
                            question_id: question.id.clone(),
                            content: option.content.clone(),
                            is_correct: option.is_correct,
                            position: o_pos as i32,
                        });
                    }
                }

                PayloadRows::Quiz {
                    quiz: QuizRecord {
                        id: quiz.id.clone(),
                        module_id: module.id.clone(),
                        num_of_questions: quiz.num_of_questions,
                    },
                    questions,
                    options,
                }
            }
        };

        ModuleRows {
            module: record,
            payload,
        }
    }
}

fn module_with(record: ModuleRecord, content: ModuleContent) -> Module {
    Module {
        id: record.id,
        course_id: record.course_id,
        title: record.title,
        is_private: record.is_private,
        created_at: record.created_at,
        content,
    }
}

pub fn assemble_video(record: ModuleRecord, video: Video) -> Module {
    module_with(record, ModuleContent::Video { video })
}

/// Rebuilds the quiz tree, ordering children by their stored position.
/// Options whose question is not part of `questions` are dropped.
pub fn assemble_quiz(
    record: ModuleRecord,
    quiz: QuizRecord,
    mut questions: Vec<QuestionRecord>,
    mut options: Vec<OptionRecord>,
) -> Module {
    questions.sort_by_key(|q| q.position);
    options.sort_by_key(|o| o.position);

    let questions = questions
        .into_iter()
        .map(|question| {
            let question_options = options
                .iter()
                .filter(|o| o.question_id == question.id)
                .map(|o| QuizOption {
                    id: o.id.clone(),
                    question_id: o.question_id.clone(),
                    content: o.content.clone(),
                    is_correct: o.is_correct,
                })
                .collect();

            Question {
                id: question.id,
                quiz_id: question.quiz_id,
                content: question.content,
                options: question_options,
            }
        })
        .collect();

    let quiz = Quiz {
        id: quiz.id,
        module_id: quiz.module_id,
        num_of_questions: quiz.num_of_questions,
        questions,
    };

    module_with(record, ModuleContent::Quiz { quiz })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dto::request::{OptionRequest, QuestionRequest};

    fn sample_quiz_module() -> Module {
        let questions = vec![
            QuestionRequest {
                content: "first".to_string(),
                options: vec![
                    OptionRequest { content: "a".to_string(), is_correct: false },
                    OptionRequest { content: "b".to_string(), is_correct: true },
                ],
            },
            QuestionRequest {
                content: "second".to_string(),
                options: vec![OptionRequest { content: "c".to_string(), is_correct: true }],
            },
        ];
        Module::new_quiz("course-1", "Quiz", |id| Quiz::from_request(id, &questions))
    }

    #[test]
    fn quiz_decomposes_into_positioned_rows() {
        let module = sample_quiz_module();
        let rows = ModuleRows::from(&module);

        assert_eq!(rows.row_count(), 1 + 1 + 2 + 3);
        assert_eq!(rows.module.module_type, ModuleType::Quiz);
        match rows.payload {
            PayloadRows::Quiz { quiz, questions, options } => {
                assert_eq!(quiz.module_id, module.id);
                assert_eq!(questions[1].position, 1);
                assert_eq!(options[1].content, "b");
                assert_eq!(options[1].position, 1);
                assert_eq!(options[2].position, 0);
            }
            PayloadRows::Video(_) => panic!("expected quiz rows"),
        }
    }

    #[test]
    fn assemble_quiz_restores_order_regardless_of_row_order() {
        let module = sample_quiz_module();
        let rows = ModuleRows::from(&module);

        let PayloadRows::Quiz { quiz, mut questions, mut options } = rows.payload else {
            panic!("expected quiz rows");
        };
        questions.reverse();
        options.reverse();

        let rebuilt = assemble_quiz(rows.module, quiz, questions, options);
        assert_eq!(rebuilt, module);
    }

    #[test]
    fn video_round_trips_through_rows() {
        let module = Module::new_video("course-1", "Intro", false, "key");
        let rows = ModuleRows::from(&module);

        assert_eq!(rows.row_count(), 2);
        let PayloadRows::Video(video) = rows.payload else {
            panic!("expected video row");
        };
        assert_eq!(assemble_video(rows.module, video), module);
    }
}
