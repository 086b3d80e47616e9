use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rand_core::OsRng;
use tracing::{debug, info};

use inkwell_types::api::{
    AuthRequest, AuthResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::token::{issue_token, verify_token};
use crate::{AppState, blocking};

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=32;
const MIN_PASSWORD_LEN: usize = 8;

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim().to_string();
    let password = req.password;

    // Validate input
    if !USERNAME_LEN.contains(&username.chars().count())
        || password.chars().count() < MIN_PASSWORD_LEN
    {
        return Err(ApiError::BadRequest("Register Failed"));
    }

    let name = username.clone();
    let user_id = blocking(&state, move |db| {
        // Hash password with Argon2id
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("Password hashing failed: {}", e))?
            .to_string();

        db.create_user(&name, &password_hash)
    })
    .await?
    .ok_or(ApiError::Conflict("Username already exists"))?;

    info!("Registered user {} ({})", username, user_id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Register Success".into(),
            user_id,
            username,
        }),
    ))
}

/// POST /api/login — unknown user and wrong password are indistinguishable.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim().to_string();
    let password = req.password;

    let name = username.clone();
    let user = blocking(&state, move |db| {
        let Some(user) = db.get_user_by_username(&name)? else {
            return Ok(None);
        };

        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| anyhow!("Corrupt password hash for user {}: {}", user.user_id, e))?;

        let valid = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        Ok(valid.then_some(user))
    })
    .await?;

    let Some(user) = user else {
        debug!("Rejected login for {}", username);
        return Err(ApiError::Unauthorized("Login Failed"));
    };

    let token = issue_token(&state.jwt_secret, user.user_id, &user.username, state.token_ttl)?;

    Ok(Json(LoginResponse {
        message: "Login Success".into(),
        user_id: user.user_id,
        username: user.username,
        token,
    }))
}

/// POST /api/auth — echo back the claims of a still-valid token.
pub async fn verify(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = req.token.as_deref().map(str::trim).unwrap_or_default();
    let claims = verify_token(&state.jwt_secret, token).map_err(|e| {
        debug!("Token rejected: {}", e);
        ApiError::Unauthorized("Unauthorized")
    })?;

    Ok(Json(AuthResponse {
        message: "Authorized".into(),
        user: claims,
    }))
}
