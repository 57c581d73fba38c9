use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Instructor,
    Student,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Instructor {
    pub fn new(email: &str, password_hash: &str) -> Self {
        Instructor {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(email: &str, password_hash: &str) -> Self {
        Student {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// An authenticated account, tagged with the table it was resolved from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Principal {
    Instructor(Instructor),
    Student(Student),
}

impl Principal {
    pub fn role(&self) -> Role {
        match self {
            Principal::Instructor(_) => Role::Instructor,
            Principal::Student(_) => Role::Student,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Principal::Instructor(instructor) => &instructor.email,
            Principal::Student(student) => &student.email,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Principal::Instructor(instructor) => &instructor.id,
            Principal::Student(student) => &student.id,
        }
    }
}
