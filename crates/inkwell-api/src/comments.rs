use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use inkwell_types::api::{CommentPageResponse, NewCommentRequest, NewCommentResponse};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::params::{DEFAULT_COMMENT_LIMIT, parse_id, parse_limit, parse_page, total_pages};
use crate::{AppState, blocking, rows};

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    pub article_id: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// GET /api/comment?article_id=&limit=&page=
pub async fn get_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let article_id = parse_id(query.article_id.as_deref())
        .ok_or(ApiError::BadRequest("Get Comment failed"))?;
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_COMMENT_LIMIT);
    let page = parse_page(query.page.as_deref());
    let offset = i64::from(page - 1) * i64::from(limit);

    let (found, total) = blocking(&state, move |db| {
        let found = db.get_comments(article_id, limit, offset)?;
        let total = db.count_comments(article_id)?;
        Ok((found, total))
    })
    .await?;

    Ok(Json(CommentPageResponse {
        message: "Get Comment success".into(),
        comments: found.into_iter().map(rows::comment).collect(),
        total_page: total_pages(total, limit),
    }))
}

/// POST /api/new-comment
pub async fn new_comment(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.comment.trim().is_empty() {
        return Err(ApiError::BadRequest("New comment failed"));
    }

    let row = blocking(&state, move |db| {
        db.create_comment(&req.comment, req.user_id, req.article_id)
    })
    .await?
    .ok_or(ApiError::BadRequest("New comment failed"))?;

    Ok((
        StatusCode::CREATED,
        Json(NewCommentResponse {
            message: "New comment success".into(),
            comment: rows::comment(row),
        }),
    ))
}
