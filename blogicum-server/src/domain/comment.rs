use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) text: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CommentRequest {
    pub(crate) text: String,
}

impl CommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation {
                field: "text",
                message: "must not be empty",
            });
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}
