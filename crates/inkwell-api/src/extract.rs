use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use inkwell_types::api::{
    AuthRequest, CreateArticleRequest, GetArticleRequest, LikeRequest, LoginRequest,
    NewCommentRequest, RegisterRequest,
};

use crate::error::ApiError;

/// Request bodies know which error their route answers with when the JSON
/// is missing, malformed, or the wrong shape.
pub trait RequestBody {
    fn rejected() -> ApiError;
}

/// `Json<T>` whose rejections become the route's `{ message }` error
/// instead of axum's plain-text 4xx.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + RequestBody + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(JsonBody(body)),
            Err(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                Err(T::rejected())
            }
        }
    }
}

impl RequestBody for RegisterRequest {
    fn rejected() -> ApiError {
        ApiError::BadRequest("Register Failed")
    }
}

impl RequestBody for LoginRequest {
    fn rejected() -> ApiError {
        ApiError::BadRequest("Login Failed")
    }
}

impl RequestBody for AuthRequest {
    fn rejected() -> ApiError {
        ApiError::Unauthorized("Unauthorized")
    }
}

impl RequestBody for CreateArticleRequest {
    fn rejected() -> ApiError {
        ApiError::BadRequest("Create Blog Failed")
    }
}

impl RequestBody for GetArticleRequest {
    fn rejected() -> ApiError {
        ApiError::BadRequest("Get Article failed")
    }
}

impl RequestBody for NewCommentRequest {
    fn rejected() -> ApiError {
        ApiError::BadRequest("New comment failed")
    }
}

impl RequestBody for LikeRequest {
    fn rejected() -> ApiError {
        ApiError::BadRequest("Like failed")
    }
}
