use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::debug;

use inkwell_types::api::{LikeRequest, LikeResponse};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::params::parse_id;
use crate::{AppState, blocking};

#[derive(Debug, Deserialize)]
pub struct LikeQuery {
    pub article_id: Option<String>,
    pub user_id: Option<String>,
}

/// GET /api/like?article_id=&user_id=
pub async fn get_likes(
    State(state): State<AppState>,
    Query(query): Query<LikeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let article_id =
        parse_id(query.article_id.as_deref()).ok_or(ApiError::BadRequest("Get Like failed"))?;
    let user_id = parse_id(query.user_id.as_deref());

    let (likes, liked) = blocking(&state, move |db| {
        let likes = db.count_likes(article_id)?;
        let liked = match user_id {
            Some(uid) => db.has_liked(uid, article_id)?,
            None => false,
        };
        Ok((likes, liked))
    })
    .await?;

    Ok(Json(LikeResponse {
        message: "Get Like success".into(),
        likes,
        liked,
    }))
}

/// POST /api/like — liking twice is a no-op.
pub async fn like(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let LikeRequest { user_id, article_id } = req;

    let likes = blocking(&state, move |db| {
        let Some(added) = db.like_article(user_id, article_id)? else {
            return Ok(None);
        };
        if !added {
            debug!("User {} already likes article {}", user_id, article_id);
        }
        Ok(Some(db.count_likes(article_id)?))
    })
    .await?
    .ok_or(ApiError::BadRequest("Like failed"))?;

    Ok(Json(LikeResponse {
        message: "Like success".into(),
        likes,
        liked: true,
    }))
}

/// DELETE /api/unlike — removing a like that isn't there is a no-op.
pub async fn unlike(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LikeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let LikeRequest { user_id, article_id } = req;

    let likes = blocking(&state, move |db| {
        if !db.unlike_article(user_id, article_id)? {
            debug!("User {} had not liked article {}", user_id, article_id);
        }
        db.count_likes(article_id)
    })
    .await?;

    Ok(Json(LikeResponse {
        message: "Unlike success".into(),
        likes,
        liked: false,
    }))
}
