use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageQuery};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

const COMMENT_COLUMNS: &str = "id, post_id, content, author, rating, creation_date, displayed";

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError>;
    async fn find_displayed_for_post(
        &self,
        post_id: i64,
        query: PageQuery,
    ) -> Result<Page<Comment>, DomainError>;
    async fn save(&self, comment: Comment) -> Result<Comment, DomainError>;
    /// No-op when the id matches nothing. Never touches the parent post.
    async fn delete_by_id(&self, id: i64) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, comment: &Comment) -> Result<Comment, DomainError> {
        let inserted = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, content, author, rating, creation_date, displayed)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, post_id, content, author, rating, creation_date, displayed
            "#,
        )
        .bind(comment.post_id)
        .bind(&comment.content)
        .bind(&comment.author)
        .bind(comment.rating)
        .bind(comment.creation_date)
        .bind(comment.displayed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to insert comment: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(
            comment_id = inserted.id,
            post_id = inserted.post_id,
            "comment created"
        );
        Ok(inserted)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id comment {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn find_displayed_for_post(
        &self,
        post_id: i64,
        query: PageQuery,
    ) -> Result<Page<Comment>, DomainError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE post_id = $1 AND displayed = TRUE",
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 AND displayed = TRUE \
             ORDER BY {} {} LIMIT $2 OFFSET $3",
            query.sort.field.column(),
            query.sort.direction.as_sql(),
        );
        let content = sqlx::query_as::<_, Comment>(&sql)
            .bind(post_id)
            .bind(query.size)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching displayed comments: {}", e);
                DomainError::Internal(e.to_string())
            })?;

        Ok(Page::new(content, total, query.size))
    }

    async fn save(&self, comment: Comment) -> Result<Comment, DomainError> {
        if comment.id == 0 {
            return self.insert(&comment).await;
        }

        // post_id and creation_date stay as first written.
        let updated = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $1, author = $2, rating = $3, displayed = $4
            WHERE id = $5
            RETURNING id, post_id, content, author, rating, creation_date, displayed
            "#,
        )
        .bind(&comment.content)
        .bind(&comment.author)
        .bind(comment.rating)
        .bind(comment.displayed)
        .bind(comment.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update comment {}: {}", comment.id, e);
            DomainError::Internal(e.to_string())
        })?;

        match updated {
            Some(saved) => {
                info!(comment_id = saved.id, "comment updated");
                Ok(saved)
            }
            None => self.insert(&comment).await,
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete comment {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        if deleted.rows_affected() > 0 {
            info!(comment_id = id, "comment deleted");
        }
        Ok(())
    }
}
