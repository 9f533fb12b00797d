//! In-memory repositories for service tests. Both repositories share one
//! store so post/comment interactions (cascade delete, comment counts) stay
//! observable without a live database.

use std::sync::{Arc, Mutex};

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageQuery, Sort, SortDirection, SortField};
use crate::domain::post::Post;
use async_trait::async_trait;

#[derive(Default)]
struct StoreInner {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    next_post_id: i64,
    next_comment_id: i64,
    post_saves: usize,
    comment_saves: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn post_saves(&self) -> usize {
        self.inner.lock().unwrap().post_saves
    }

    pub fn comment_saves(&self) -> usize {
        self.inner.lock().unwrap().comment_saves
    }

    pub fn comment_count(&self, post_id: i64) -> usize {
        self.inner
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .count()
    }
}

fn sort_posts(posts: &mut [Post], sort: Sort) {
    posts.sort_by(|a, b| {
        let ord = match sort.field {
            SortField::CreationDate => a.creation_date.cmp(&b.creation_date),
            SortField::Rating => a.rating.cmp(&b.rating),
            SortField::Author => a.author.cmp(&b.author),
            SortField::Id => a.id.cmp(&b.id),
        };
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn sort_comments(comments: &mut [Comment], sort: Sort) {
    comments.sort_by(|a, b| {
        let ord = match sort.field {
            SortField::CreationDate => a.creation_date.cmp(&b.creation_date),
            SortField::Rating => a.rating.cmp(&b.rating),
            SortField::Author => a.author.cmp(&b.author),
            SortField::Id => a.id.cmp(&b.id),
        };
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn paginate<T>(items: Vec<T>, page: i64, size: i64) -> Page<T> {
    let total = items.len() as i64;
    let content = items
        .into_iter()
        .skip((page * size) as usize)
        .take(size as usize)
        .collect();
    Page::new(content, total, size)
}

pub struct InMemoryPostRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.store.inner.lock().unwrap().posts.clone())
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Post>, DomainError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .posts
            .iter()
            .filter(|p| p.author == author)
            .cloned()
            .collect())
    }

    async fn find_by_content(&self, text: &str) -> Result<Vec<Post>, DomainError> {
        let needle = text.to_lowercase();
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .posts
            .iter()
            .filter(|p| p.content.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_displayed(&self, query: PageQuery) -> Result<Page<Post>, DomainError> {
        let mut displayed: Vec<Post> = {
            let inner = self.store.inner.lock().unwrap();
            inner.posts.iter().filter(|p| p.displayed).cloned().collect()
        };
        sort_posts(&mut displayed, query.sort);
        Ok(paginate(displayed, query.page, query.size))
    }

    async fn find_ranked_by_comment_count(
        &self,
        page: i64,
        size: i64,
    ) -> Result<Page<Post>, DomainError> {
        let mut ranked: Vec<(usize, Post)> = {
            let inner = self.store.inner.lock().unwrap();
            inner
                .posts
                .iter()
                .map(|p| {
                    let count = inner.comments.iter().filter(|c| c.post_id == p.id).count();
                    (count, p.clone())
                })
                .collect()
        };
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.id.cmp(&b.1.id)));
        let posts: Vec<Post> = ranked.into_iter().map(|(_, p)| p).collect();
        Ok(paginate(posts, page, size))
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        let mut inner = self.store.inner.lock().unwrap();
        inner.post_saves += 1;
        if post.id != 0 {
            if let Some(existing) = inner.posts.iter_mut().find(|p| p.id == post.id) {
                let creation_date = existing.creation_date;
                *existing = Post {
                    creation_date,
                    ..post
                };
                return Ok(existing.clone());
            }
        }
        inner.next_post_id += 1;
        let saved = Post {
            id: inner.next_post_id,
            ..post
        };
        inner.posts.push(saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DomainError> {
        let mut inner = self.store.inner.lock().unwrap();
        inner.posts.retain(|p| p.id != id);
        inner.comments.retain(|c| c.post_id != id);
        Ok(())
    }
}

pub struct InMemoryCommentRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryCommentRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_displayed_for_post(
        &self,
        post_id: i64,
        query: PageQuery,
    ) -> Result<Page<Comment>, DomainError> {
        let mut displayed: Vec<Comment> = {
            let inner = self.store.inner.lock().unwrap();
            inner
                .comments
                .iter()
                .filter(|c| c.post_id == post_id && c.displayed)
                .cloned()
                .collect()
        };
        sort_comments(&mut displayed, query.sort);
        Ok(paginate(displayed, query.page, query.size))
    }

    async fn save(&self, comment: Comment) -> Result<Comment, DomainError> {
        let mut inner = self.store.inner.lock().unwrap();
        inner.comment_saves += 1;
        if comment.id != 0 {
            if let Some(existing) = inner.comments.iter_mut().find(|c| c.id == comment.id) {
                let creation_date = existing.creation_date;
                let post_id = existing.post_id;
                *existing = Comment {
                    creation_date,
                    post_id,
                    ..comment
                };
                return Ok(existing.clone());
            }
        }
        inner.next_comment_id += 1;
        let saved = Comment {
            id: inner.next_comment_id,
            ..comment
        };
        inner.comments.push(saved.clone());
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DomainError> {
        let mut inner = self.store.inner.lock().unwrap();
        inner.comments.retain(|c| c.id != id);
        Ok(())
    }
}
