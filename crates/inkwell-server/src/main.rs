use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use inkwell_api::{AppState, AppStateInner, routes};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "inkwell=debug,inkwell_api=debug,inkwell_db=info,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let jwt_secret = std::env::var("INKWELL_JWT_SECRET").unwrap_or_default();
    check_jwt_secret(&jwt_secret)?;

    let db_path: PathBuf = std::env::var("INKWELL_DB_PATH")
        .unwrap_or_else(|_| "inkwell.db".into())
        .into();
    let host = std::env::var("INKWELL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("INKWELL_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let token_ttl_minutes: i64 = std::env::var("INKWELL_TOKEN_TTL_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&m| m > 0)
        .unwrap_or(60);

    // Init database
    let db = inkwell_db::Database::open(&db_path)?;

    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        token_ttl: chrono::Duration::minutes(token_ttl_minutes),
    });

    let app = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Inkwell server listening on {}", addr);
    info!("Session tokens valid for {} minutes", token_ttl_minutes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn check_jwt_secret(secret: &str) -> anyhow::Result<()> {
    if secret.is_empty() || PLACEHOLDER_SECRETS.contains(&secret) {
        anyhow::bail!("INKWELL_JWT_SECRET is unset or still a placeholder; set it in .env and restart");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable ({}), only Ctrl+C will stop the server", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_secrets_are_refused() {
        assert!(check_jwt_secret("").is_err());
        assert!(check_jwt_secret("dev-secret-change-me").is_err());
        assert!(check_jwt_secret("change-me-to-a-random-string").is_err());
        assert!(check_jwt_secret("a-real-secret").is_ok());
    }
}
