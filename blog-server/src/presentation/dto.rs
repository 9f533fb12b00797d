use crate::domain::page::{Page, PageQuery, Sort, SortDirection, SortField};
use crate::domain::post::Post;
use serde::{Deserialize, Serialize};

/// Paged request as it arrives over HTTP. `page` is one-based here; the
/// storage layer works zero-based and the conversion happens exactly once,
/// in [`PageableRequest::to_query`].
#[derive(Debug, Clone, Deserialize)]
pub struct PageableRequest {
    pub page: i64,
    pub size: i64,
    #[serde(default = "default_sort_field")]
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

fn default_sort_field() -> String {
    "creationDate".into()
}

impl PageableRequest {
    pub fn to_query(&self) -> PageQuery {
        PageQuery {
            page: (self.page - 1).max(0),
            size: self.size,
            sort: Sort {
                field: SortField::parse(&self.field).unwrap_or(SortField::CreationDate),
                direction: self.direction,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageableResponse {
    pub content: Vec<Post>,
    pub page: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl PageableResponse {
    pub fn from_page(page: Page<Post>, requested_page: i64) -> Self {
        Self {
            content: page.content,
            page: requested_page,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub content: String,
}

/// Create/update payload for a post. An absent (or zero) id means creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub content: String,
    pub author: String,
    pub preview: String,
    pub tags: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub displayed: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub displayed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pageable_request_defaults_to_creation_date_desc() {
        let request: PageableRequest = serde_json::from_str(r#"{"page": 1, "size": 10}"#).unwrap();
        assert_eq!(request.field, "creationDate");
        assert_eq!(request.direction, SortDirection::Desc);
    }

    #[test]
    fn to_query_converts_one_based_to_zero_based() {
        let request: PageableRequest = serde_json::from_str(r#"{"page": 3, "size": 5}"#).unwrap();
        let query = request.to_query();
        assert_eq!(query.page, 2);
        assert_eq!(query.offset(), 10);
    }

    #[test]
    fn to_query_clamps_pages_below_one() {
        let request: PageableRequest = serde_json::from_str(r#"{"page": 0, "size": 5}"#).unwrap();
        assert_eq!(request.to_query().page, 0);
    }

    #[test]
    fn unknown_sort_field_falls_back_to_creation_date() {
        let request: PageableRequest =
            serde_json::from_str(r#"{"page": 1, "size": 5, "field": "nope", "direction": "ASC"}"#)
                .unwrap();
        let query = request.to_query();
        assert_eq!(query.sort.field, SortField::CreationDate);
        assert_eq!(query.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn post_request_accepts_minimal_payload() {
        let request: PostRequest = serde_json::from_str(
            r#"{"content": "test123", "author": "test", "preview": "123", "tags": "tag1"}"#,
        )
        .unwrap();
        assert_eq!(request.id, None);
        assert_eq!(request.rating, None);
        assert_eq!(request.displayed, None);
    }
}
