//! Authentication and permission middleware
//!
//! `require_auth` verifies the bearer token, rejects non-admin claims and
//! resolves the role's permission set once per request. `require_permission`
//! layers an ANY-of permission check on top of it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use std::collections::HashSet;

use crate::auth::jwt;
use crate::auth::permissions::Permission;
use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;

/// Authenticated admin identity, injected into request extensions
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub id: i64,
    pub username: String,
    pub role_id: i64,
    pub permissions: HashSet<Permission>,
}

impl AdminIdentity {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// ANY-of semantics: one matching permission is enough
    pub fn has_any_permission(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.has_permission(*p))
    }
}

/// Middleware that extracts and verifies the admin JWT from the
/// `Authorization` header and resolves the caller's permission set.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::with_message(ErrorCode::TokenInvalid, "Invalid Authorization format"))?;

    let claims = jwt::validate_token(token, &state.jwt_secret).map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::new(ErrorCode::TokenExpired),
            _ => AppError::new(ErrorCode::TokenInvalid),
        }
    })?;

    if !claims.is_admin {
        tracing::warn!(user_id = claims.sub, "Token without admin claim rejected");
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    let permissions = db::roles::permissions_for_role(&state.pool, claims.role_id).await?;

    let identity = AdminIdentity {
        id: claims.sub,
        username: claims.username,
        role_id: claims.role_id,
        permissions,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Permission check middleware requiring any one of `required`.
///
/// ```ignore
/// Router::new()
///     .route("/api/orders", get(orders::list_orders))
///     .layer(middleware::from_fn(require_permission(&[Permission::ManageOrders])));
/// ```
pub fn require_permission(
    required: &'static [Permission],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let identity = req
                .extensions()
                .get::<AdminIdentity>()
                .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated))?;

            if !identity.has_any_permission(required) {
                let names = required
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::warn!(
                    user_id = identity.id,
                    username = %identity.username,
                    required = %names,
                    "Permission denied"
                );
                return Err(AppError::permission_denied(format!(
                    "Permission denied: requires one of [{names}]"
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(permissions: &[Permission]) -> AdminIdentity {
        AdminIdentity {
            id: 1,
            username: "ops".into(),
            role_id: 2,
            permissions: permissions.iter().copied().collect(),
        }
    }

    #[test]
    fn any_of_needs_only_one_match() {
        let user = identity(&[Permission::ManageOrders]);
        assert!(user.has_any_permission(&[Permission::ManageAdmins, Permission::ManageOrders]));
        assert!(!user.has_any_permission(&[Permission::ManageAdmins, Permission::ManagePayments]));
    }

    #[test]
    fn empty_permission_set_denies_everything() {
        let user = identity(&[]);
        for p in Permission::ALL {
            assert!(!user.has_permission(*p));
        }
    }
}
