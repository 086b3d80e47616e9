pub mod articles;
pub mod auth;
pub mod comments;
pub mod error;
pub mod extract;
pub mod likes;
pub mod params;
pub mod routes;
pub mod rows;
pub mod token;

use std::sync::Arc;

use inkwell_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Lifetime of tokens issued by `/api/login`.
    pub token_ttl: chrono::Duration,
}

/// Run blocking work (SQLite, Argon2) off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(result)
}
