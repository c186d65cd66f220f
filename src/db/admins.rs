//! Admin account queries

use sqlx::PgPool;

use crate::error::ServiceResult;

#[derive(sqlx::FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role_id: i64,
}

/// Listing row with the role name joined in; the password hash never leaves
/// the database layer through this type.
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct AdminSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub role_id: i64,
    pub role_name: String,
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<AdminSummary>> {
    let rows: Vec<AdminSummary> = sqlx::query_as(
        r#"
        SELECT a.id, a.name, a.email, a.username, a.role_id, r.name AS role_name
        FROM admin_users a
        JOIN admin_roles r ON r.id = a.role_id
        ORDER BY a.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Find by login identifier: email or username.
pub async fn find_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> ServiceResult<Option<AdminUser>> {
    let row: Option<AdminUser> = sqlx::query_as(
        r#"
        SELECT id, name, email, username, password_hash, role_id
        FROM admin_users
        WHERE email = $1 OR username = $1
        "#,
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> ServiceResult<Option<AdminUser>> {
    let row: Option<AdminUser> = sqlx::query_as(
        "SELECT id, name, email, username, password_hash, role_id FROM admin_users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn email_exists(pool: &PgPool, email: &str) -> ServiceResult<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM admin_users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn username_exists(pool: &PgPool, username: &str) -> ServiceResult<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM admin_users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    email: &str,
    username: &str,
    password_hash: &str,
    role_id: i64,
) -> ServiceResult<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO admin_users (name, email, username, password_hash, role_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .bind(role_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Update name and role; the password hash only changes when a new one is
/// supplied.
pub async fn update(
    pool: &PgPool,
    id: i64,
    name: &str,
    role_id: i64,
    password_hash: Option<&str>,
) -> ServiceResult<()> {
    sqlx::query(
        r#"
        UPDATE admin_users
        SET name = $2, role_id = $3, password_hash = COALESCE($4, password_hash)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(role_id)
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    sqlx::query("DELETE FROM admin_users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
