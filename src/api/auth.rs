//! Login endpoint

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::jwt;
use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Email or username
    pub identifier: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub role_id: i64,
    pub permissions: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// POST /api/auth/login
///
/// Unknown identifier and wrong password both answer with the same
/// invalid-credentials rejection.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    if payload.identifier.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Identifier and password are required"));
    }

    let Some(user) = db::admins::find_by_identifier(&state.pool, payload.identifier.trim()).await?
    else {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    };

    let hash = PasswordHash::new(&user.password_hash).map_err(|e| {
        tracing::error!(user_id = user.id, error = %e, "Stored password hash is malformed");
        AppError::new(ErrorCode::InternalError)
    })?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &hash)
        .is_err()
    {
        tracing::warn!(username = %user.username, "Failed login attempt");
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let token = jwt::create_token(user.id, &user.username, user.role_id, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!(error = %e, "Token generation failed");
            AppError::new(ErrorCode::InternalError)
        })?;

    let granted = db::roles::permissions_for_role(&state.pool, user.role_id).await?;
    let mut permissions: Vec<&'static str> = granted.iter().map(|p| p.as_str()).collect();
    permissions.sort_unstable();

    tracing::info!(user_id = user.id, username = %user.username, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            name: user.name,
            email: user.email,
            username: user.username,
            role_id: user.role_id,
            permissions,
        },
    }))
}
