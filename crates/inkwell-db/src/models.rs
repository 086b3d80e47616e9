//! Database row types — these map directly to SQLite rows.
//! Distinct from inkwell-types API models to keep the DB layer independent.
//! Timestamps stay as SQLite text (`YYYY-MM-DD HH:MM:SS`, UTC).

pub struct UserRow {
    pub user_id: i64,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct ArticleRow {
    pub article_id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: String,
}

pub struct CommentRow {
    pub comment_id: i64,
    pub content: String,
    pub user_id: i64,
    pub article_id: i64,
    pub created_at: String,
    pub username: String,
}
