use crate::normalize::{trim_in_place, Normalize};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    #[serde(rename = "taskId")]
    pub task_id: Uuid,
    pub content: String,
    pub author: String,
    pub created_by: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateComment {
    #[serde(rename = "taskId")]
    pub task_id: Uuid,

    #[validate(length(min = 1, message = "Task ID and content are required"))]
    pub content: String,
}

impl Normalize for CreateComment {
    fn normalize(&mut self) {
        trim_in_place(&mut self.content);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateComment {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

impl Normalize for UpdateComment {
    fn normalize(&mut self) {
        trim_in_place(&mut self.content);
    }
}
