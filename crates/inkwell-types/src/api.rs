use serde::{Deserialize, Deserializer, Serialize, de};

use crate::models::{Article, Comment};

// -- Helpers --

/// Accept an integer id either as a JSON number or as a numeric string
/// (`5` or `"5"`), since form-driven clients often send the latter.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id: {:?}", s))),
    }
}

// -- JWT Claims --

/// Claims carried by session tokens. Returned verbatim by `/api/auth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub exp: usize,
}

// -- Generic --

/// Body of every error response, and of any success that has nothing else to say.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: Claims,
}

// -- Articles --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    #[serde(deserialize_with = "lenient_id")]
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateArticleResponse {
    pub message: String,
    pub article: Article,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetArticleRequest {
    #[serde(deserialize_with = "lenient_id")]
    pub article_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetArticleResponse {
    pub message: String,
    pub article: Article,
    pub author: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleListResponse {
    pub message: String,
    pub articles: Vec<Article>,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCommentRequest {
    pub comment: String,
    #[serde(deserialize_with = "lenient_id")]
    pub user_id: i64,
    #[serde(deserialize_with = "lenient_id")]
    pub article_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewCommentResponse {
    pub message: String,
    pub comment: Comment,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentPageResponse {
    pub message: String,
    pub comments: Vec<Comment>,
    #[serde(rename = "totalPage")]
    pub total_page: u64,
}

// -- Likes --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LikeRequest {
    #[serde(deserialize_with = "lenient_id")]
    pub user_id: i64,
    #[serde(deserialize_with = "lenient_id")]
    pub article_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub message: String,
    pub likes: u64,
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        let req: GetArticleRequest = serde_json::from_str(r#"{"article_id": 5}"#).unwrap();
        assert_eq!(req.article_id, 5);

        let req: GetArticleRequest = serde_json::from_str(r#"{"article_id": " 5 "}"#).unwrap();
        assert_eq!(req.article_id, 5);

        let req: LikeRequest = serde_json::from_str(r#"{"user_id": "2", "article_id": 9}"#).unwrap();
        assert_eq!((req.user_id, req.article_id), (2, 9));
    }

    #[test]
    fn ids_reject_non_numeric_input() {
        assert!(serde_json::from_str::<GetArticleRequest>(r#"{"article_id": "five"}"#).is_err());
        assert!(serde_json::from_str::<GetArticleRequest>(r#"{"article_id": 1.5}"#).is_err());
        assert!(serde_json::from_str::<GetArticleRequest>(r#"{}"#).is_err());
    }

    #[test]
    fn auth_token_may_be_null_or_absent() {
        let req: AuthRequest = serde_json::from_str(r#"{"token": null}"#).unwrap();
        assert!(req.token.is_none());
        let req: AuthRequest = serde_json::from_str("{}").unwrap();
        assert!(req.token.is_none());
    }
}
