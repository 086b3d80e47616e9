use crate::models::{ArticleRow, CommentRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, Row};

const ARTICLE_COLUMNS: &str = "article_id, title, content, author_id, created_at";

impl Database {
    // -- Users --

    /// Insert a user. Returns `None` when the username is already taken.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                (username, password_hash),
            );
            match inserted {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(e) if is_constraint_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT user_id, username, password, created_at FROM users WHERE username = ?1",
                [username],
                user_from_row,
            )
            .optional()
        })
    }

    pub fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, user_id))
    }

    // -- Articles --

    /// Insert an article and read it back. Returns `None` if the author does not exist.
    pub fn create_article(&self, title: &str, content: &str, author_id: i64) -> Result<Option<ArticleRow>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO articles (title, content, author_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![title, content, author_id],
            );
            match inserted {
                Ok(_) => {}
                Err(e) if is_constraint_violation(&e) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
            query_article(conn, conn.last_insert_rowid())
        })
    }

    pub fn get_article(&self, article_id: i64) -> Result<Option<ArticleRow>> {
        self.with_conn(|conn| query_article(conn, article_id))
    }

    /// Newest articles first, at most `limit` rows. A non-empty `search`
    /// filters on a case-insensitive (Unicode-aware) title substring.
    pub fn list_articles(&self, limit: u32, search: Option<&str>) -> Result<Vec<ArticleRow>> {
        self.with_conn(|conn| match search {
            Some(term) if !term.is_empty() => {
                let sql = format!(
                    "SELECT {} FROM articles
                     WHERE unicode_lower(title) LIKE ?1 ESCAPE '\\'
                     ORDER BY created_at DESC, article_id DESC
                     LIMIT ?2",
                    ARTICLE_COLUMNS
                );
                let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
                collect_articles(conn, &sql, rusqlite::params![pattern, limit])
            }
            _ => {
                let sql = format!(
                    "SELECT {} FROM articles ORDER BY created_at DESC, article_id DESC LIMIT ?1",
                    ARTICLE_COLUMNS
                );
                collect_articles(conn, &sql, rusqlite::params![limit])
            }
        })
    }

    pub fn list_articles_by_author(&self, author_id: i64) -> Result<Vec<ArticleRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM articles WHERE author_id = ?1 ORDER BY created_at DESC, article_id DESC",
                ARTICLE_COLUMNS
            );
            collect_articles(conn, &sql, rusqlite::params![author_id])
        })
    }

    // -- Comments --

    /// Insert a comment and return it joined with the commenter's username.
    /// Returns `None` if the user or the article does not exist.
    pub fn create_comment(&self, content: &str, user_id: i64, article_id: i64) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO comments (content, user_id, article_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![content, user_id, article_id],
            );
            match inserted {
                Ok(_) => {}
                Err(e) if is_constraint_violation(&e) => return Ok(None),
                Err(e) => return Err(e.into()),
            }

            let comment_id = conn.last_insert_rowid();
            conn.query_row(
                "SELECT c.comment_id, c.content, c.user_id, c.article_id, c.created_at, u.username
                 FROM comments c
                 LEFT JOIN users u ON c.user_id = u.user_id
                 WHERE c.comment_id = ?1",
                [comment_id],
                comment_from_row,
            )
            .optional()
        })
    }

    /// One page of an article's comments, oldest first.
    pub fn get_comments(&self, article_id: i64, limit: u32, offset: i64) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            // JOIN users to fetch username in a single query (no N+1)
            let mut stmt = conn.prepare(
                "SELECT c.comment_id, c.content, c.user_id, c.article_id, c.created_at, u.username
                 FROM comments c
                 LEFT JOIN users u ON c.user_id = u.user_id
                 WHERE c.article_id = ?1
                 ORDER BY c.created_at ASC, c.comment_id ASC
                 LIMIT ?2 OFFSET ?3",
            )?;

            let rows = stmt
                .query_map(rusqlite::params![article_id, limit, offset], comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn count_comments(&self, article_id: i64) -> Result<u64> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM comments WHERE article_id = ?1",
                [article_id],
                |row| row.get(0),
            )?;
            Ok(total as u64)
        })
    }

    // -- Likes --

    /// Record a like. `Some(true)` if it was new, `Some(false)` if the user
    /// already liked the article, `None` if the user or article does not exist.
    pub fn like_article(&self, user_id: i64, article_id: i64) -> Result<Option<bool>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO article_likes (user_id, article_id) VALUES (?1, ?2)",
                rusqlite::params![user_id, article_id],
            );
            match inserted {
                Ok(changed) => Ok(Some(changed > 0)),
                Err(e) if is_constraint_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Remove a like. Returns whether a row was actually deleted.
    pub fn unlike_article(&self, user_id: i64, article_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM article_likes WHERE user_id = ?1 AND article_id = ?2",
                rusqlite::params![user_id, article_id],
            )?;
            Ok(removed > 0)
        })
    }

    pub fn count_likes(&self, article_id: i64) -> Result<u64> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM article_likes WHERE article_id = ?1",
                [article_id],
                |row| row.get(0),
            )?;
            Ok(total as u64)
        })
    }

    pub fn has_liked(&self, user_id: i64, article_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let liked: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM article_likes WHERE user_id = ?1 AND article_id = ?2)",
                rusqlite::params![user_id, article_id],
                |row| row.get(0),
            )?;
            Ok(liked)
        })
    }
}

fn query_user_by_id(conn: &Connection, user_id: i64) -> Result<Option<UserRow>> {
    conn.query_row(
        "SELECT user_id, username, password, created_at FROM users WHERE user_id = ?1",
        [user_id],
        user_from_row,
    )
    .optional()
}

fn query_article(conn: &Connection, article_id: i64) -> Result<Option<ArticleRow>> {
    let sql = format!("SELECT {} FROM articles WHERE article_id = ?1", ARTICLE_COLUMNS);
    conn.query_row(&sql, [article_id], article_from_row).optional()
}

fn collect_articles(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<ArticleRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, article_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        user_id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<ArticleRow> {
    Ok(ArticleRow {
        article_id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        comment_id: row.get(0)?,
        content: row.get(1)?,
        user_id: row.get(2)?,
        article_id: row.get(3)?,
        created_at: row.get(4)?,
        username: row.get::<_, Option<String>>(5)?.unwrap_or_else(|| "Unknown".to_string()),
    })
}

/// Escape LIKE wildcards so user input matches literally (paired with `ESCAPE '\'`).
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// UNIQUE / FOREIGN KEY failures are expected outcomes, not server errors.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let alice = db.create_user("alice", "hash").unwrap().unwrap();
        let article = db.create_article("Hello", "First post", alice).unwrap().unwrap();
        (db, alice, article.article_id)
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.create_user("alice", "hash").unwrap().is_some());
        assert!(db.create_user("alice", "other").unwrap().is_none());
    }

    #[test]
    fn user_lookups() {
        let (db, alice, _) = seeded();
        let by_name = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(by_name.user_id, alice);
        assert_eq!(by_name.password, "hash");
        assert!(db.get_user_by_username("bob").unwrap().is_none());
        assert_eq!(db.get_user_by_id(alice).unwrap().unwrap().username, "alice");
        assert!(db.get_user_by_id(alice + 100).unwrap().is_none());
    }

    #[test]
    fn article_requires_existing_author() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.create_article("t", "c", 42).unwrap().is_none());
    }

    #[test]
    fn list_articles_respects_limit_and_order() {
        let (db, alice, first) = seeded();
        let second = db.create_article("World", "Second", alice).unwrap().unwrap();
        db.create_article("Again", "Third", alice).unwrap().unwrap();

        let rows = db.list_articles(2, None).unwrap();
        assert_eq!(rows.len(), 2);
        // Same-second inserts fall back to id order
        assert!(rows[0].article_id > rows[1].article_id);
        assert_eq!(rows[1].article_id, second.article_id);
        assert!(rows.iter().all(|r| r.article_id != first));
    }

    #[test]
    fn search_is_case_insensitive_and_literal() {
        let (db, alice, _) = seeded();
        db.create_article("100% Rust", "c", alice).unwrap().unwrap();
        db.create_article("Shell tricks", "c", alice).unwrap().unwrap();

        let hits = db.list_articles(10, Some("hel")).unwrap();
        let titles: Vec<_> = hits.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Shell tricks", "Hello"]);

        let pct = db.list_articles(10, Some("%")).unwrap();
        assert_eq!(pct.len(), 1);
        assert_eq!(pct[0].title, "100% Rust");

        // Empty search behaves like no search
        assert_eq!(db.list_articles(10, Some("")).unwrap().len(), 3);
    }

    #[test]
    fn search_still_honours_limit() {
        let (db, alice, _) = seeded();
        for i in 0..5 {
            db.create_article(&format!("Post {}", i), "c", alice).unwrap().unwrap();
        }

        let hits = db.list_articles(3, Some("post")).unwrap();
        let titles: Vec<_> = hits.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Post 4", "Post 3", "Post 2"]);
    }

    #[test]
    fn search_folds_non_ascii_case() {
        let (db, alice, _) = seeded();
        db.create_article("ÉCOLE d'été", "c", alice).unwrap().unwrap();
        db.create_article("Привет, мир", "c", alice).unwrap().unwrap();
        db.create_article("สวัสดี บล็อก", "c", alice).unwrap().unwrap();

        let hits = db.list_articles(10, Some("école")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "ÉCOLE d'été");

        let hits = db.list_articles(10, Some("ПРИВЕТ")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Привет, мир");

        let hits = db.list_articles(10, Some("บล็อก")).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn articles_by_author() {
        let (db, alice, _) = seeded();
        let bob = db.create_user("bob", "hash").unwrap().unwrap();
        db.create_article("Bob's", "c", bob).unwrap().unwrap();

        assert_eq!(db.list_articles_by_author(alice).unwrap().len(), 1);
        assert_eq!(db.list_articles_by_author(bob).unwrap()[0].title, "Bob's");
        assert!(db.list_articles_by_author(999).unwrap().is_empty());
    }

    #[test]
    fn comments_paginate_oldest_first() {
        let (db, alice, article) = seeded();
        for i in 0..7 {
            db.create_comment(&format!("c{}", i), alice, article).unwrap().unwrap();
        }

        assert_eq!(db.count_comments(article).unwrap(), 7);

        let page1 = db.get_comments(article, 5, 0).unwrap();
        assert_eq!(page1.len(), 5);
        assert_eq!(page1[0].content, "c0");
        assert_eq!(page1[0].username, "alice");

        let page2 = db.get_comments(article, 5, 5).unwrap();
        let contents: Vec<_> = page2.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["c5", "c6"]);
    }

    #[test]
    fn comment_requires_user_and_article() {
        let (db, alice, article) = seeded();
        assert!(db.create_comment("x", alice + 50, article).unwrap().is_none());
        assert!(db.create_comment("x", alice, article + 50).unwrap().is_none());

        let created = db.create_comment("hi", alice, article).unwrap().unwrap();
        assert_eq!(created.username, "alice");
        assert_eq!(created.article_id, article);
    }

    #[test]
    fn likes_are_idempotent() {
        let (db, alice, article) = seeded();

        assert_eq!(db.like_article(alice, article).unwrap(), Some(true));
        assert_eq!(db.like_article(alice, article).unwrap(), Some(false));
        assert_eq!(db.count_likes(article).unwrap(), 1);
        assert!(db.has_liked(alice, article).unwrap());

        assert!(db.unlike_article(alice, article).unwrap());
        assert!(!db.unlike_article(alice, article).unwrap());
        assert_eq!(db.count_likes(article).unwrap(), 0);
        assert!(!db.has_liked(alice, article).unwrap());
    }

    #[test]
    fn like_requires_user_and_article() {
        let (db, alice, article) = seeded();
        assert_eq!(db.like_article(alice + 9, article).unwrap(), None);
        assert_eq!(db.like_article(alice, article + 9).unwrap(), None);
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("a%b_c\\"), "a\\%b\\_c\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
