use chrono::{DateTime, Utc};
use tracing::warn;

use inkwell_db::models::{ArticleRow, CommentRow};
use inkwell_types::models::{Article, Comment};

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone;
/// read them as UTC.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub fn article(row: ArticleRow) -> Article {
    Article {
        article_id: row.article_id,
        title: row.title,
        content: row.content,
        author_id: row.author_id,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn comment(row: CommentRow) -> Comment {
    Comment {
        comment_id: row.comment_id,
        content: row.content,
        user_id: row.user_id,
        article_id: row.article_id,
        created_at: parse_timestamp(&row.created_at),
        username: row.username,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_sqlite_datetime() {
        let ts = parse_timestamp("2024-03-05 14:07:09");
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 5));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 7, 9));
    }

    #[test]
    fn parses_rfc3339() {
        let ts = parse_timestamp("2024-03-05T14:07:09Z");
        assert_eq!(ts.hour(), 14);
    }

    #[test]
    fn corrupt_falls_back_to_epoch() {
        assert_eq!(parse_timestamp("yesterday"), DateTime::<Utc>::default());
    }
}
