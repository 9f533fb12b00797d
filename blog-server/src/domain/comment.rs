use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a post. `post_id` is set at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub rating: i32,
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub displayed: bool,
}
