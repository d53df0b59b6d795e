//! Todo row and insert payload.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Days between creation and the default due date.
pub const DUE_IN_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub message: String,
    pub label: String,
    pub due_date: DateTime<Utc>,
}

/// Column values for an insert; the id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub message: String,
    pub label: String,
    pub due_date: DateTime<Utc>,
}

impl NewTodo {
    pub fn new(message: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            label: label.into(),
            due_date: Utc::now() + TimeDelta::days(DUE_IN_DAYS),
        }
    }
}
