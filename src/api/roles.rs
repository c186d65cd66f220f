//! Role management endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::AdminIdentity;
use crate::db::roles as role_db;
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;

use super::ApiResult;

#[derive(Debug, Serialize)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: role_db::Role,
    pub permissions: Vec<role_db::PermissionRow>,
}

#[derive(Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleWithPermissions>,
    pub permissions: Vec<role_db::PermissionRow>,
}

/// GET /api/roles: roles with nested permissions, plus the full catalog
pub async fn list(State(state): State<AppState>) -> ApiResult<RolesResponse> {
    let permissions = role_db::list_permissions(&state.pool).await?;

    let mut roles = Vec::new();
    for role in role_db::list_roles(&state.pool).await? {
        let granted = role_db::role_permissions(&state.pool, role.id).await?;
        roles.push(RoleWithPermissions {
            role,
            permissions: granted,
        });
    }

    Ok(Json(RolesResponse { roles, permissions }))
}

#[derive(Deserialize)]
pub struct RolePayload {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<i64>,
}

/// POST /api/roles
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<RolePayload>,
) -> ApiResult<RoleWithPermissions> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Role name is required"));
    }

    tracing::info!(
        user_id = identity.id,
        role_name = %payload.name,
        "Creating role"
    );

    let role = role_db::create_role(
        &state.pool,
        payload.name.trim(),
        payload.description.as_deref(),
        &payload.permissions,
    )
    .await?;

    let granted = role_db::role_permissions(&state.pool, role.id).await?;
    Ok(Json(RoleWithPermissions {
        role,
        permissions: granted,
    }))
}

/// PUT /api/roles/{id}: updates metadata and replaces permission mappings
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(role_id): Path<i64>,
    Json(payload): Json<RolePayload>,
) -> ApiResult<RoleWithPermissions> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Role name is required"));
    }

    role_db::find_role(&state.pool, role_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::NotFound, format!("Role {role_id} not found")))?;

    tracing::info!(user_id = identity.id, role_id, "Updating role");

    role_db::update_role(
        &state.pool,
        role_id,
        payload.name.trim(),
        payload.description.as_deref(),
        &payload.permissions,
    )
    .await?;

    let role = role_db::find_role(&state.pool, role_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NotFound))?;
    let granted = role_db::role_permissions(&state.pool, role_id).await?;
    Ok(Json(RoleWithPermissions {
        role,
        permissions: granted,
    }))
}

/// DELETE /api/roles/{id}
///
/// Guards run before any write: protected system roles are never deleted,
/// and a role still held by admins fails with an actionable conflict.
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(role_id): Path<i64>,
) -> ApiResult<bool> {
    let role = role_db::find_role(&state.pool, role_id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::NotFound, format!("Role {role_id} not found")))?;

    if role.is_protected {
        return Err(AppError::new(ErrorCode::RoleProtected));
    }

    let holders = role_db::admin_count_for_role(&state.pool, role_id).await?;
    if holders > 0 {
        return Err(AppError::with_message(
            ErrorCode::RoleInUse,
            format!("Role is assigned to {holders} admin account(s)"),
        )
        .with_detail("admin_count", holders));
    }

    role_db::delete_role(&state.pool, role_id).await?;

    tracing::info!(user_id = identity.id, role_id, role_name = %role.name, "Role deleted");
    Ok(Json(true))
}
