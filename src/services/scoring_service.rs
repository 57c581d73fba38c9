use std::{collections::HashMap, sync::Arc};

use validator::Validate;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::{
        domain::{ModuleContent, Quiz, Score},
        dto::request::SubmitQuizRequest,
    },
    repositories::{ModuleRepository, ScoreRepository},
    services::{AccessGate, PrincipalService},
};

/// Counts chosen identifiers that name a correct option of `quiz`. Unknown
/// identifiers, options of other quizzes, and wrong answers add nothing.
/// Repeats count every time they appear.
pub fn tally_score(quiz: &Quiz, chosen: &[String]) -> i64 {
    let answer_key: HashMap<&str, bool> = quiz
        .questions
        .iter()
        .flat_map(|q| q.options.iter())
        .map(|o| (o.id.as_str(), o.is_correct))
        .collect();

    chosen
        .iter()
        .filter(|id| answer_key.get(id.as_str()).copied().unwrap_or(false))
        .count() as i64
}

pub struct ScoringService {
    principals: Arc<PrincipalService>,
    gate: Arc<AccessGate>,
    modules: Arc<dyn ModuleRepository>,
    scores: Arc<dyn ScoreRepository>,
}

impl ScoringService {
    pub fn new(
        principals: Arc<PrincipalService>,
        gate: Arc<AccessGate>,
        modules: Arc<dyn ModuleRepository>,
        scores: Arc<dyn ScoreRepository>,
    ) -> Self {
        Self {
            principals,
            gate,
            modules,
            scores,
        }
    }

    /// Scores one submission and appends it to the student's history.
    /// Nothing is written unless every check passes.
    pub async fn submit_quiz_response(
        &self,
        claims: &Claims,
        course_id: &str,
        request: SubmitQuizRequest,
    ) -> AppResult<Score> {
        request.validate()?;
        let student = self.principals.student_for(claims).await?;
        self.gate.authorize_learner(&student, course_id).await?;
        let quiz = self.quiz_in_course(course_id, &request.module_id).await?;

        let value = tally_score(&quiz, &request.response);
        let score = self.scores.create(Score::new(&student.id, &quiz.id, value)).await?;

        log::info!(
            "student '{}' scored {} on quiz '{}'",
            student.email,
            score.score_value,
            quiz.id
        );
        Ok(score)
    }

    /// Every recorded attempt, newest first.
    pub async fn score_history(
        &self,
        claims: &Claims,
        course_id: &str,
        module_id: &str,
    ) -> AppResult<Vec<Score>> {
        let student = self.principals.student_for(claims).await?;
        self.gate.authorize_learner(&student, course_id).await?;
        let quiz = self.quiz_in_course(course_id, module_id).await?;

        self.scores.find_by_student_and_quiz(&student.id, &quiz.id).await
    }

    async fn quiz_in_course(&self, course_id: &str, module_id: &str) -> AppResult<Quiz> {
        let module = self
            .modules
            .find_by_id(module_id)
            .await?
            .filter(|m| m.course_id == course_id)
            .ok_or_else(|| AppError::NotFound("module not found".to_string()))?;

        match module.content {
            ModuleContent::Quiz { quiz } => Ok(quiz),
            ModuleContent::Video { .. } => {
                Err(AppError::PolicyViolation("incorrect module type".to_string()))
            }
        }
    }
}
