use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub instructor_id: String,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn new(instructor_id: &str, title: &str, description: Option<String>) -> Self {
        Course {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description,
            is_published: false,
            published_at: None,
            instructor_id: instructor_id.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Marks the course published. The first publication time is kept.
    pub fn publish(&mut self, at: DateTime<Utc>) {
        if !self.is_published {
            self.is_published = true;
            self.published_at = Some(at);
        }
    }
}
