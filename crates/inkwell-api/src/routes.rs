use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{AppState, articles, auth, comments, likes};

/// All `/api` routes. CORS and tracing layers are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Auth
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/auth", post(auth::verify))
        // Articles
        .route("/api/create-blog", post(articles::create_article))
        .route("/api/blog", get(articles::list_articles))
        .route(
            "/api/article",
            post(articles::get_article).get(articles::list_author_articles),
        )
        // Comments
        .route("/api/comment", get(comments::get_comments))
        .route("/api/new-comment", post(comments::new_comment))
        // Likes
        .route("/api/like", get(likes::get_likes).post(likes::like))
        .route("/api/unlike", delete(likes::unlike))
        .with_state(state)
}
