use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageQuery};
use crate::domain::post::Post;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

const POST_COLUMNS: &str = "id, content, author, rating, preview, tags, creation_date, displayed";

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Post>, DomainError>;
    async fn find_by_author(&self, author: &str) -> Result<Vec<Post>, DomainError>;
    /// Case-insensitive substring match against post content.
    async fn find_by_content(&self, text: &str) -> Result<Vec<Post>, DomainError>;
    async fn find_displayed(&self, query: PageQuery) -> Result<Page<Post>, DomainError>;
    /// Posts ordered by descending count of their comments, ties broken by
    /// ascending post id so the order is stable.
    async fn find_ranked_by_comment_count(
        &self,
        page: i64,
        size: i64,
    ) -> Result<Page<Post>, DomainError>;
    async fn save(&self, post: Post) -> Result<Post, DomainError>;
    /// Deletes the post together with all of its comments. No-op when the
    /// id matches nothing.
    async fn delete_by_id(&self, id: i64) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, post: &Post) -> Result<Post, DomainError> {
        let inserted = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (content, author, rating, preview, tags, creation_date, displayed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, content, author, rating, preview, tags, creation_date, displayed
            "#,
        )
        .bind(&post.content)
        .bind(&post.author)
        .bind(post.rating)
        .bind(&post.preview)
        .bind(&post.tags)
        .bind(post.creation_date)
        .bind(post.displayed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to insert post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = inserted.id, author = %inserted.author, "post created");
        Ok(inserted)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY id");
        sqlx::query_as::<_, Post>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts: {}", e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE author = $1 ORDER BY id");
        sqlx::query_as::<_, Post>(&sql)
            .bind(author)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts by author: {}", e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn find_by_content(&self, text: &str) -> Result<Vec<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE content ILIKE $1 ORDER BY id");
        sqlx::query_as::<_, Post>(&sql)
            .bind(format!("%{}%", text))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while searching posts: {}", e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn find_displayed(&self, query: PageQuery) -> Result<Page<Post>, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE displayed = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE displayed = TRUE \
             ORDER BY {} {} LIMIT $1 OFFSET $2",
            query.sort.field.column(),
            query.sort.direction.as_sql(),
        );
        let content = sqlx::query_as::<_, Post>(&sql)
            .bind(query.size)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching displayed posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;

        Ok(Page::new(content, total, query.size))
    }

    async fn find_ranked_by_comment_count(
        &self,
        page: i64,
        size: i64,
    ) -> Result<Page<Post>, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let content = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.content, p.author, p.rating, p.preview, p.tags,
                   p.creation_date, p.displayed
            FROM posts p
            LEFT JOIN comments c ON c.post_id = p.id
            GROUP BY p.id
            ORDER BY COUNT(c.id) DESC, p.id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(size)
        .bind(page * size)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while ranking posts: {}", e);
            DomainError::Internal(e.to_string())
        })?;

        Ok(Page::new(content, total, size))
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        if post.id == 0 {
            return self.insert(&post).await;
        }

        // creation_date is deliberately left out of the update list.
        let updated = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET content = $1, author = $2, rating = $3, preview = $4, tags = $5, displayed = $6
            WHERE id = $7
            RETURNING id, content, author, rating, preview, tags, creation_date, displayed
            "#,
        )
        .bind(&post.content)
        .bind(&post.author)
        .bind(post.rating)
        .bind(&post.preview)
        .bind(&post.tags)
        .bind(post.displayed)
        .bind(post.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", post.id, e);
            DomainError::Internal(e.to_string())
        })?;

        match updated {
            Some(saved) => {
                info!(post_id = saved.id, "post updated");
                Ok(saved)
            }
            // Unknown id: the store keeps save semantics and creates a new row.
            None => self.insert(&post).await,
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("failed to delete comments of post {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() > 0 {
            info!(post_id = id, "post deleted");
        }
        Ok(())
    }
}
