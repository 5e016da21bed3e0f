use chrono::Utc;

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{PostRepository, PostWithCategory};
use crate::domain::comment::{Comment, CommentRequest};
use crate::domain::error::DomainError;

pub(crate) struct CommentService<P, M> {
    posts: P,
    comments: M,
}

impl<P, M> CommentService<P, M>
where
    P: PostRepository,
    M: CommentRepository,
{
    pub(crate) fn new(posts: P, comments: M) -> Self {
        Self { posts, comments }
    }

    /// Commenting requires the post to be visible to the commenter, same
    /// predicate as the detail view.
    pub(crate) async fn add_comment(
        &self,
        author_id: i64,
        post_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;

        let PostWithCategory {
            post,
            category_is_published,
        } = self
            .posts
            .get_post_with_category(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        if !post.is_visible_to(Some(author_id), category_is_published, Utc::now()) {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }

        self.comments
            .create_comment(NewComment {
                post_id: post.id,
                author_id,
                text: req.text,
            })
            .await
    }

    pub(crate) async fn edit_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;

        let comment = self.require_comment(comment_id, post_id).await?;
        if comment.author_id != actor_user_id {
            return Err(DomainError::NotOwner { post_id });
        }

        self.comments
            .update_comment_text(comment.id, req.text)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))
    }

    pub(crate) async fn delete_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        let comment = self.require_comment(comment_id, post_id).await?;
        if comment.author_id != actor_user_id {
            return Err(DomainError::NotOwner { post_id });
        }

        let deleted = self.comments.delete_comment(comment.id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }
        Ok(())
    }

    async fn require_comment(
        &self,
        comment_id: i64,
        post_id: i64,
    ) -> Result<Comment, DomainError> {
        self.comments
            .get_comment_for_post(comment_id, post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))
    }
}
