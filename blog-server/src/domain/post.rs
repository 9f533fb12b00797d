use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post. `id` 0 means the post has not been persisted yet;
/// the store assigns the real id on first save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub id: i64,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub rating: i32,
    pub preview: String,
    pub tags: String,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub displayed: bool,
}
