use std::sync::Arc;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::{comment::Comment, error::DomainError};
use crate::presentation::dto::{CommentRequest, PageableRequest};
use chrono::Utc;
use tracing::instrument;

#[derive(Clone)]
pub struct CommentService<C, P>
where
    C: CommentRepository + 'static,
    P: PostRepository + 'static,
{
    comments: Arc<C>,
    posts: Arc<P>,
}

impl<C, P> CommentService<C, P>
where
    C: CommentRepository + 'static,
    P: PostRepository + 'static,
{
    pub fn new(comments: Arc<C>, posts: Arc<P>) -> Self {
        Self { comments, posts }
    }

    /// Attaches a new comment to an existing post. The post must exist.
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        post_id: i64,
        request: CommentRequest,
    ) -> Result<Comment, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound)?;

        let comment = Comment {
            id: 0,
            post_id,
            content: request.content,
            author: request.author,
            rating: request.rating.unwrap_or(0),
            creation_date: Utc::now(),
            displayed: request.displayed.unwrap_or(false),
        };
        self.comments.save(comment).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, comment_id: i64) -> Result<(), DomainError> {
        self.comments.delete_by_id(comment_id).await
    }

    #[instrument(skip(self))]
    pub async fn change_displayed(&self, comment_id: i64) -> Result<(), DomainError> {
        let comment = self.retrieve(comment_id).await?;
        let updated = Comment {
            displayed: !comment.displayed,
            ..comment
        };
        self.comments.save(updated).await?;
        Ok(())
    }

    pub async fn get_displayed(
        &self,
        post_id: i64,
        request: &PageableRequest,
    ) -> Result<Vec<Comment>, DomainError> {
        let page = self
            .comments
            .find_displayed_for_post(post_id, request.to_query())
            .await?;
        Ok(page.content)
    }

    #[instrument(skip(self))]
    pub async fn like(&self, comment_id: i64) -> Result<(), DomainError> {
        let comment = self.retrieve(comment_id).await?;
        let updated = Comment {
            rating: comment.rating + 1,
            ..comment
        };
        self.comments.save(updated).await?;
        Ok(())
    }

    /// Ratings floor at zero: disliking an unrated comment writes nothing.
    #[instrument(skip(self))]
    pub async fn dislike(&self, comment_id: i64) -> Result<(), DomainError> {
        let comment = self.retrieve(comment_id).await?;
        if comment.rating > 0 {
            let updated = Comment {
                rating: comment.rating - 1,
                ..comment
            };
            self.comments.save(updated).await?;
        }
        Ok(())
    }

    async fn retrieve(&self, comment_id: i64) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound)
    }
}
