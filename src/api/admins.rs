//! Admin account endpoints

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::AdminIdentity;
use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;

use super::ApiResult;

const MIN_PASSWORD_LEN: usize = 6;

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::new(ErrorCode::InternalError)
        })
}

/// GET /api/admins
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<db::admins::AdminSummary>> {
    let admins = db::admins::list(&state.pool).await?;
    Ok(Json(admins))
}

#[derive(Deserialize)]
pub struct AdminCreate {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role_id: i64,
}

/// POST /api/admins
///
/// Email and username uniqueness are explicit preconditions so each failure
/// surfaces as its own actionable message.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<AdminCreate>,
) -> ApiResult<db::admins::AdminSummary> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.username.trim().is_empty()
    {
        return Err(AppError::validation("Name, email and username are required"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    db::roles::find_role(&state.pool, payload.role_id)
        .await?
        .ok_or_else(|| AppError::invalid_request(format!("Role {} does not exist", payload.role_id)))?;

    if db::admins::email_exists(&state.pool, payload.email.trim()).await? {
        return Err(AppError::already_exists("Email already in use"));
    }
    if db::admins::username_exists(&state.pool, payload.username.trim()).await? {
        return Err(AppError::already_exists("Username already in use"));
    }

    let password_hash = hash_password(&payload.password)?;
    let id = db::admins::create(
        &state.pool,
        payload.name.trim(),
        payload.email.trim(),
        payload.username.trim(),
        &password_hash,
        payload.role_id,
    )
    .await?;

    tracing::info!(
        user_id = identity.id,
        created_admin_id = id,
        username = %payload.username,
        "Admin account created"
    );

    let admins = db::admins::list(&state.pool).await?;
    let created = admins
        .into_iter()
        .find(|a| a.id == id)
        .ok_or_else(|| AppError::new(ErrorCode::InternalError))?;
    Ok(Json(created))
}

#[derive(Deserialize)]
pub struct AdminUpdate {
    pub name: String,
    pub role_id: i64,
    /// Re-hashed and stored only when present
    pub password: Option<String>,
}

/// PUT /api/admins/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(admin_id): Path<i64>,
    Json(payload): Json<AdminUpdate>,
) -> ApiResult<bool> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Name and role are required"));
    }

    db::admins::find_by_id(&state.pool, admin_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::NotFound, "Admin not found"))?;

    db::roles::find_role(&state.pool, payload.role_id)
        .await?
        .ok_or_else(|| AppError::invalid_request(format!("Role {} does not exist", payload.role_id)))?;

    let password_hash = match payload.password.as_deref() {
        Some(p) if p.len() >= MIN_PASSWORD_LEN => Some(hash_password(p)?),
        Some(_) => {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        None => None,
    };

    db::admins::update(
        &state.pool,
        admin_id,
        payload.name.trim(),
        payload.role_id,
        password_hash.as_deref(),
    )
    .await?;

    tracing::info!(user_id = identity.id, admin_id, "Admin account updated");
    Ok(Json(true))
}

/// DELETE /api/admins/{id}
///
/// Check order matters: existence first, then the protected-role guard,
/// then self-deletion, and only then the delete itself.
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(admin_id): Path<i64>,
) -> ApiResult<bool> {
    let target = db::admins::find_by_id(&state.pool, admin_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::NotFound, "Admin not found"))?;

    let role = db::roles::find_role(&state.pool, target.role_id).await?;
    if role.is_some_and(|r| r.is_protected) {
        return Err(AppError::new(ErrorCode::CannotDeleteAdmin));
    }

    if target.id == identity.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    db::admins::delete(&state.pool, admin_id).await?;

    tracing::info!(
        user_id = identity.id,
        deleted_admin_id = admin_id,
        username = %target.username,
        "Admin account deleted"
    );
    Ok(Json(true))
}
