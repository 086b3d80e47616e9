use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use inkwell_types::api::{
    ArticleListResponse, CreateArticleRequest, CreateArticleResponse, GetArticleRequest,
    GetArticleResponse,
};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::params::{DEFAULT_BLOG_LIMIT, parse_id, parse_limit};
use crate::{AppState, blocking, rows};

#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    pub limit: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    pub author_id: Option<String>,
}

/// POST /api/create-blog
pub async fn create_article(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateArticleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Create Blog Failed"));
    }

    let row = blocking(&state, move |db| {
        db.create_article(&req.title, &req.content, req.user_id)
    })
    .await?
    .ok_or(ApiError::BadRequest("Create Blog Failed"))?;

    info!("Article {} created by user {}", row.article_id, row.author_id);

    Ok((
        StatusCode::CREATED,
        Json(CreateArticleResponse {
            message: "Create Blog Success".into(),
            article: rows::article(row),
        }),
    ))
}

/// GET /api/blog?limit=&search=
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_BLOG_LIMIT);
    let search = query.search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let found = blocking(&state, move |db| db.list_articles(limit, search.as_deref())).await?;
    if found.is_empty() {
        return Err(ApiError::NotFound("Get Blog Failed"));
    }

    Ok(Json(ArticleListResponse {
        message: "Get Blog success".into(),
        articles: found.into_iter().map(rows::article).collect(),
    }))
}

/// POST /api/article — one article plus its author's username.
pub async fn get_article(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<GetArticleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let article_id = req.article_id;
    let found = blocking(&state, move |db| {
        let Some(article) = db.get_article(article_id)? else {
            return Ok(None);
        };
        let author = db.get_user_by_id(article.author_id)?.map(|u| u.username);
        Ok(Some((article, author)))
    })
    .await?;

    let (article, author) = found.ok_or(ApiError::BadRequest("Get Article failed"))?;

    Ok(Json(GetArticleResponse {
        message: "Get Article success".into(),
        article: rows::article(article),
        author: author.unwrap_or_else(|| "Unknown".into()),
    }))
}

/// GET /api/article?author_id=
pub async fn list_author_articles(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let author_id = parse_id(query.author_id.as_deref())
        .ok_or(ApiError::BadRequest("Get Articles failed"))?;

    let found = blocking(&state, move |db| db.list_articles_by_author(author_id)).await?;

    Ok(Json(ArticleListResponse {
        message: "Get Articles success".into(),
        articles: found.into_iter().map(rows::article).collect(),
    }))
}
