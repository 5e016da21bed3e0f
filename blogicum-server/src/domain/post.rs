use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}

/// Listing read model: a post plus the number of comments under it.
#[derive(Debug, Clone)]
pub(crate) struct PostPreview {
    pub(crate) post: Post,
    pub(crate) comment_count: i64,
}

impl Post {
    /// The public visibility predicate: published flag set, publish date
    /// not in the future, parent category published.
    pub(crate) fn is_public_at(&self, category_is_published: bool, now: DateTime<Utc>) -> bool {
        self.is_published && self.pub_date <= now && category_is_published
    }

    /// Detail views widen visibility: the author always sees their own post.
    pub(crate) fn is_visible_to(
        &self,
        viewer_id: Option<i64>,
        category_is_published: bool,
        now: DateTime<Utc>,
    ) -> bool {
        self.is_public_at(category_is_published, now) || viewer_id == Some(self.author_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
    /// Omitted means "now"; a future date schedules the post.
    pub(crate) pub_date: Option<DateTime<Utc>>,
    pub(crate) is_published: bool,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        validate_positive_i64("category_id", self.category_id)?;
        if let Some(location_id) = self.location_id {
            validate_positive_i64("location_id", location_id)?;
        }
        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            ..self
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) category_id: i64,
    pub(crate) location_id: Option<i64>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        validate_positive_i64("category_id", self.category_id)?;
        if let Some(location_id) = self.location_id {
            validate_positive_i64("location_id", location_id)?;
        }
        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            ..self
        })
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.len() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::Validation {
            field: "text",
            message: "must not be empty",
        });
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{CreatePostRequest, DomainError, Post, UpdatePostRequest};

    fn sample_post(author_id: i64, is_published: bool, pub_date_offset_secs: i64) -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            title: "Title".to_string(),
            text: "Text".to_string(),
            pub_date: now + Duration::seconds(pub_date_offset_secs),
            author_id,
            category_id: 1,
            location_id: None,
            is_published,
            created_at: now,
        }
    }

    #[test]
    fn published_past_post_in_published_category_is_public() {
        let post = sample_post(10, true, -60);
        assert!(post.is_public_at(true, Utc::now()));
    }

    #[test]
    fn unpublished_post_is_not_public() {
        let post = sample_post(10, false, -60);
        assert!(!post.is_public_at(true, Utc::now()));
    }

    #[test]
    fn future_dated_post_is_not_public_until_pub_date_passes() {
        let post = sample_post(10, true, 60);
        assert!(!post.is_public_at(true, Utc::now()));
        assert!(post.is_public_at(true, post.pub_date + Duration::seconds(1)));
    }

    #[test]
    fn post_in_unpublished_category_is_not_public() {
        let post = sample_post(10, true, -60);
        assert!(!post.is_public_at(false, Utc::now()));
    }

    #[test]
    fn author_sees_own_hidden_post() {
        let post = sample_post(10, false, 60);
        assert!(post.is_visible_to(Some(10), false, Utc::now()));
    }

    #[test]
    fn other_viewer_does_not_see_hidden_post() {
        let post = sample_post(10, false, -60);
        assert!(!post.is_visible_to(Some(11), true, Utc::now()));
        assert!(!post.is_visible_to(None, true, Utc::now()));
    }

    #[test]
    fn create_request_rejects_empty_title() {
        let req = CreatePostRequest {
            title: "   ".to_string(),
            text: "text".to_string(),
            category_id: 1,
            location_id: None,
            pub_date: None,
            is_published: true,
        };
        let err = req.validate().expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn create_request_rejects_non_positive_category() {
        let req = CreatePostRequest {
            title: "title".to_string(),
            text: "text".to_string(),
            category_id: 0,
            location_id: None,
            pub_date: None,
            is_published: true,
        };
        let err = req.validate().expect_err("category_id must be rejected");
        assert_validation_field(err, "category_id");
    }

    #[test]
    fn update_request_normalizes_fields() {
        let req = UpdatePostRequest {
            title: "  title  ".to_string(),
            text: "  text  ".to_string(),
            category_id: 1,
            location_id: Some(2),
            pub_date: Utc::now(),
            is_published: false,
        };
        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title, "title");
        assert_eq!(validated.text, "text");
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
