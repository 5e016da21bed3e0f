use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Administrative grouping for posts. Categories are created out of band
/// (there are no mutation routes for them); an unpublished category hides
/// every post under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Category {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}
