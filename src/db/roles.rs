//! Role and permission queries

use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashSet;

use crate::auth::Permission;
use crate::error::{AppError, ServiceResult};

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct PermissionRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_protected: bool,
}

/// Resolve the permission set granted to a role.
///
/// A role with zero grants yields an empty set. Names in the table that are
/// not part of the closed catalog are logged and skipped.
pub async fn permissions_for_role(
    pool: &PgPool,
    role_id: i64,
) -> ServiceResult<HashSet<Permission>> {
    let names: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT p.name
        FROM role_permissions rp
        JOIN permissions p ON p.id = rp.permission_id
        WHERE rp.role_id = $1
        "#,
    )
    .bind(role_id)
    .fetch_all(pool)
    .await?;

    let mut set = HashSet::with_capacity(names.len());
    for (name,) in names {
        match Permission::parse(&name) {
            Some(p) => {
                set.insert(p);
            }
            None => {
                tracing::warn!(role_id, permission = %name, "Unknown permission name in database, skipping");
            }
        }
    }
    Ok(set)
}

pub async fn list_permissions(pool: &PgPool) -> ServiceResult<Vec<PermissionRow>> {
    let rows: Vec<PermissionRow> =
        sqlx::query_as("SELECT id, name, description FROM permissions ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn list_roles(pool: &PgPool) -> ServiceResult<Vec<Role>> {
    let rows: Vec<Role> =
        sqlx::query_as("SELECT id, name, description, is_protected FROM admin_roles ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn find_role(pool: &PgPool, role_id: i64) -> ServiceResult<Option<Role>> {
    let row: Option<Role> =
        sqlx::query_as("SELECT id, name, description, is_protected FROM admin_roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Permission rows mapped to a role, for the roles listing.
pub async fn role_permissions(pool: &PgPool, role_id: i64) -> ServiceResult<Vec<PermissionRow>> {
    let rows: Vec<PermissionRow> = sqlx::query_as(
        r#"
        SELECT p.id, p.name, p.description
        FROM role_permissions rp
        JOIN permissions p ON p.id = rp.permission_id
        WHERE rp.role_id = $1
        ORDER BY p.id
        "#,
    )
    .bind(role_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Dedup caller-supplied permission ids and reject any that are not in the
/// catalog, before they can hit the mapping table as an FK violation.
async fn checked_permission_ids(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[i64],
) -> ServiceResult<Vec<i64>> {
    let mut wanted: Vec<i64> = ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let (known,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM permissions WHERE id = ANY($1)")
        .bind(&wanted)
        .fetch_one(&mut **tx)
        .await?;
    if known != wanted.len() as i64 {
        return Err(AppError::invalid_request("Unknown permission id").into());
    }
    Ok(wanted)
}

pub async fn create_role(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    permission_ids: &[i64],
) -> ServiceResult<Role> {
    let mut tx = pool.begin().await?;

    let permission_ids = checked_permission_ids(&mut tx, permission_ids).await?;

    let role: Role = sqlx::query_as(
        r#"
        INSERT INTO admin_roles (name, description, is_protected)
        VALUES ($1, $2, false)
        RETURNING id, name, description, is_protected
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(&mut *tx)
    .await?;

    for permission_id in &permission_ids {
        sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
            .bind(role.id)
            .bind(permission_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(role)
}

/// Update role metadata and replace its permission mappings
/// (delete-then-insert) in one transaction.
pub async fn update_role(
    pool: &PgPool,
    role_id: i64,
    name: &str,
    description: Option<&str>,
    permission_ids: &[i64],
) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let permission_ids = checked_permission_ids(&mut tx, permission_ids).await?;

    sqlx::query("UPDATE admin_roles SET name = $2, description = $3 WHERE id = $1")
        .bind(role_id)
        .bind(name)
        .bind(description)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    for permission_id in &permission_ids {
        sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
            .bind(role_id)
            .bind(permission_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Number of admin accounts currently holding the role.
pub async fn admin_count_for_role(pool: &PgPool, role_id: i64) -> ServiceResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_users WHERE role_id = $1")
        .bind(role_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn delete_role(pool: &PgPool, role_id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM admin_roles WHERE id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
