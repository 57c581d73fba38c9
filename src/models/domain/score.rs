use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One graded submission. Every submission is a new row.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: String,
    pub student_id: String,
    pub quiz_id: String,
    pub score_value: i64,
    pub submitted_at: DateTime<Utc>,
}

impl Score {
    pub fn new(student_id: &str, quiz_id: &str, score_value: i64) -> Self {
        Score {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            quiz_id: quiz_id.to_string(),
            score_value,
            submitted_at: Utc::now(),
        }
    }
}
