//! Lenient parsing of query-string values. Bad or missing input falls back to
//! a default rather than rejecting the request.

/// Upper bound on any page size a client can ask for.
pub const MAX_LIMIT: u32 = 100;

pub const DEFAULT_BLOG_LIMIT: u32 = 8;
pub const DEFAULT_COMMENT_LIMIT: u32 = 5;

/// Positive integer, capped at [`MAX_LIMIT`]; anything else yields `default`.
pub fn parse_limit(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|&v| v > 0)
        .map(|v| v.min(MAX_LIMIT as i64) as u32)
        .unwrap_or(default)
}

/// 1-based page number, defaulting to the first page.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(1)
}

pub fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
}

/// `ceil(total / limit)`; zero rows means zero pages.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_falls_back_to_default() {
        assert_eq!(parse_limit(None, 8), 8);
        assert_eq!(parse_limit(Some(""), 8), 8);
        assert_eq!(parse_limit(Some("abc"), 8), 8);
        assert_eq!(parse_limit(Some("0"), 8), 8);
        assert_eq!(parse_limit(Some("-3"), 8), 8);
        assert_eq!(parse_limit(Some(" 3 "), 8), 3);
        assert_eq!(parse_limit(Some("5000"), 8), MAX_LIMIT);
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("x")), 1);
        assert_eq!(parse_page(Some("4")), 4);
    }

    #[test]
    fn ids() {
        assert_eq!(parse_id(Some("12")), Some(12));
        assert_eq!(parse_id(Some("twelve")), None);
        assert_eq!(parse_id(None), None);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }
}
