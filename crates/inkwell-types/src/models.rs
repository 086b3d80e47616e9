use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A comment as shown under an article, carrying the commenter's username
/// so clients don't need a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: i64,
    pub content: String,
    pub user_id: i64,
    pub article_id: i64,
    pub created_at: DateTime<Utc>,
    pub username: String,
}
