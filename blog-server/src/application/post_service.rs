use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::{error::DomainError, page::Page, post::Post};
use crate::presentation::dto::{PageableRequest, PostRequest};
use chrono::Utc;
use tracing::instrument;

#[derive(Clone)]
pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get_all_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound)
    }

    /// Saves the full payload. Without an id the post is created (rating 0
    /// and hidden unless the payload says otherwise); with an id every
    /// mutable field is replaced while the creation date stays untouched.
    #[instrument(skip(self, request))]
    pub async fn create_or_update(&self, request: PostRequest) -> Result<Post, DomainError> {
        let post = Post {
            id: request.id.unwrap_or(0),
            content: request.content,
            author: request.author,
            rating: request.rating.unwrap_or(0),
            preview: request.preview,
            tags: request.tags,
            creation_date: Utc::now(),
            displayed: request.displayed.unwrap_or(false),
        };
        self.repo.save(post).await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        self.repo.delete_by_id(id).await
    }

    pub async fn get_by_author(&self, author: &str) -> Result<Vec<Post>, DomainError> {
        self.repo.find_by_author(author).await
    }

    #[instrument(skip(self))]
    pub async fn change_displayed(&self, id: i64) -> Result<(), DomainError> {
        let post = self.get_by_id(id).await?;
        let updated = Post {
            displayed: !post.displayed,
            ..post
        };
        self.repo.save(updated).await?;
        Ok(())
    }

    pub async fn get_displayed_posts(
        &self,
        request: &PageableRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.repo.find_displayed(request.to_query()).await
    }

    #[instrument(skip(self))]
    pub async fn like(&self, id: i64) -> Result<(), DomainError> {
        let post = self.get_by_id(id).await?;
        let updated = Post {
            rating: post.rating + 1,
            ..post
        };
        self.repo.save(updated).await?;
        Ok(())
    }

    /// Ratings floor at zero: disliking an unrated post writes nothing.
    #[instrument(skip(self))]
    pub async fn dislike(&self, id: i64) -> Result<(), DomainError> {
        let post = self.get_by_id(id).await?;
        if post.rating > 0 {
            let updated = Post {
                rating: post.rating - 1,
                ..post
            };
            self.repo.save(updated).await?;
        }
        Ok(())
    }

    pub async fn get_most_popular(
        &self,
        request: &PageableRequest,
    ) -> Result<Vec<Post>, DomainError> {
        let query = request.to_query();
        let page = self
            .repo
            .find_ranked_by_comment_count(query.page, query.size)
            .await?;
        Ok(page.content)
    }

    pub async fn search_by_content(&self, content: &str) -> Result<Vec<Post>, DomainError> {
        self.repo.find_by_content(content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::comment_repository::CommentRepository;
    use crate::data::memory::{InMemoryCommentRepository, InMemoryPostRepository, MemoryStore};
    use crate::domain::comment::Comment;
    use crate::domain::page::SortDirection;

    fn service(store: &Arc<MemoryStore>) -> PostService<InMemoryPostRepository> {
        PostService::new(Arc::new(InMemoryPostRepository::new(Arc::clone(store))))
    }

    fn post_request(content: &str, author: &str) -> PostRequest {
        PostRequest {
            id: None,
            content: content.into(),
            author: author.into(),
            preview: "123".into(),
            tags: "tag1".into(),
            rating: None,
            displayed: None,
        }
    }

    fn page_request(page: i64, size: i64) -> PageableRequest {
        PageableRequest {
            page,
            size,
            field: "creationDate".into(),
            direction: SortDirection::Desc,
        }
    }

    #[tokio::test]
    async fn creation_assigns_id_and_defaults() {
        let store = MemoryStore::new();
        let service = service(&store);

        let created = service
            .create_or_update(post_request("test123", "test"))
            .await
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(created.rating, 0);
        assert!(!created.displayed);
    }

    #[tokio::test]
    async fn update_replaces_fields_but_keeps_creation_date() {
        let store = MemoryStore::new();
        let service = service(&store);

        let created = service
            .create_or_update(post_request("before", "test"))
            .await
            .unwrap();

        let updated = service
            .create_or_update(PostRequest {
                id: Some(created.id),
                content: "after".into(),
                author: "test".into(),
                preview: "new".into(),
                tags: "tag2".into(),
                rating: None,
                displayed: Some(true),
            })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.content, "after");
        assert!(updated.displayed);
        assert_eq!(updated.creation_date, created.creation_date);
    }

    #[tokio::test]
    async fn change_displayed_twice_restores_original_value() {
        let store = MemoryStore::new();
        let service = service(&store);
        let created = service
            .create_or_update(post_request("test123", "test"))
            .await
            .unwrap();

        service.change_displayed(created.id).await.unwrap();
        assert!(service.get_by_id(created.id).await.unwrap().displayed);

        service.change_displayed(created.id).await.unwrap();
        assert!(!service.get_by_id(created.id).await.unwrap().displayed);
    }

    #[tokio::test]
    async fn change_displayed_fails_for_unknown_post() {
        let store = MemoryStore::new();
        let service = service(&store);

        let result = service.change_displayed(123).await;

        assert!(matches!(result, Err(DomainError::PostNotFound)));
    }

    #[tokio::test]
    async fn like_increments_and_dislike_floors_at_zero() {
        let store = MemoryStore::new();
        let service = service(&store);
        let created = service
            .create_or_update(post_request("test123", "test"))
            .await
            .unwrap();

        service.like(created.id).await.unwrap();
        assert_eq!(service.get_by_id(created.id).await.unwrap().rating, 1);

        service.dislike(created.id).await.unwrap();
        assert_eq!(service.get_by_id(created.id).await.unwrap().rating, 0);

        let saves_before = store.post_saves();
        service.dislike(created.id).await.unwrap();
        assert_eq!(service.get_by_id(created.id).await.unwrap().rating, 0);
        assert_eq!(store.post_saves(), saves_before, "dislike at zero must not write");
    }

    #[tokio::test]
    async fn like_and_dislike_fail_for_unknown_post() {
        let store = MemoryStore::new();
        let service = service(&store);

        assert!(matches!(service.like(123).await, Err(DomainError::PostNotFound)));
        assert!(matches!(service.dislike(123).await, Err(DomainError::PostNotFound)));
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_cascades_to_comments() {
        let store = MemoryStore::new();
        let service = service(&store);
        let comments = InMemoryCommentRepository::new(Arc::clone(&store));

        let post = service
            .create_or_update(post_request("test123", "test"))
            .await
            .unwrap();
        comments
            .save(Comment {
                id: 0,
                post_id: post.id,
                content: "first".into(),
                author: "reader".into(),
                rating: 0,
                creation_date: Utc::now(),
                displayed: true,
            })
            .await
            .unwrap();
        assert_eq!(store.comment_count(post.id), 1);

        service.delete_post(post.id).await.unwrap();
        assert!(matches!(
            service.get_by_id(post.id).await,
            Err(DomainError::PostNotFound)
        ));
        assert_eq!(store.comment_count(post.id), 0);

        // absent id is a no-op, not an error
        service.delete_post(post.id).await.unwrap();
    }

    #[tokio::test]
    async fn get_by_author_matches_exactly() {
        let store = MemoryStore::new();
        let service = service(&store);
        service
            .create_or_update(post_request("one", "alice"))
            .await
            .unwrap();
        service
            .create_or_update(post_request("two", "bob"))
            .await
            .unwrap();

        let posts = service.get_by_author("alice").await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "one");

        assert!(service.get_by_author("ALICE").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn displayed_page_only_contains_displayed_posts() {
        let store = MemoryStore::new();
        let service = service(&store);

        for (content, displayed) in [("visible", true), ("hidden", false), ("also visible", true)]
        {
            service
                .create_or_update(PostRequest {
                    displayed: Some(displayed),
                    ..post_request(content, "test")
                })
                .await
                .unwrap();
        }

        let page = service
            .get_displayed_posts(&page_request(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 1);
        assert!(page.content.iter().all(|p| p.displayed));
    }

    #[tokio::test]
    async fn displayed_page_math_uses_requested_size() {
        let store = MemoryStore::new();
        let service = service(&store);

        for i in 0..5 {
            service
                .create_or_update(PostRequest {
                    displayed: Some(true),
                    ..post_request(&format!("post {i}"), "test")
                })
                .await
                .unwrap();
        }

        let page = service
            .get_displayed_posts(&page_request(2, 2))
            .await
            .unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn most_popular_orders_by_comment_count_with_stable_ties() {
        let store = MemoryStore::new();
        let service = service(&store);
        let comments = InMemoryCommentRepository::new(Arc::clone(&store));

        let a = service
            .create_or_update(post_request("post a", "test"))
            .await
            .unwrap();
        let b = service
            .create_or_update(post_request("post b", "test"))
            .await
            .unwrap();
        let c = service
            .create_or_update(post_request("post c", "test"))
            .await
            .unwrap();

        for (post_id, count) in [(a.id, 2), (b.id, 1)] {
            for i in 0..count {
                comments
                    .save(Comment {
                        id: 0,
                        post_id,
                        content: format!("comment {i}"),
                        author: "reader".into(),
                        rating: 0,
                        creation_date: Utc::now(),
                        displayed: true,
                    })
                    .await
                    .unwrap();
            }
        }

        let top = service.get_most_popular(&page_request(1, 2)).await.unwrap();
        assert_eq!(
            top.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![a.id, b.id]
        );

        let rest = service.get_most_popular(&page_request(2, 2)).await.unwrap();
        assert_eq!(rest.iter().map(|p| p.id).collect::<Vec<_>>(), vec![c.id]);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring_in_insertion_order() {
        let store = MemoryStore::new();
        let service = service(&store);
        for content in ["TeSt123", "testewq", "something special"] {
            service
                .create_or_update(post_request(content, "test"))
                .await
                .unwrap();
        }

        let found = service.search_by_content("test").await.unwrap();
        assert_eq!(
            found.iter().map(|p| p.content.as_str()).collect::<Vec<_>>(),
            vec!["TeSt123", "testewq"]
        );
    }
}
