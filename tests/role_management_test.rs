//! Role management integration tests

mod common;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use sqlx::PgPool;

use ferrum_admin::api::roles::{self, RolePayload};
use ferrum_admin::error::ErrorCode;

#[sqlx::test]
async fn role_with_unknown_permission_id_is_rejected(pool: PgPool) {
    let fx = common::seed_base(&pool).await;
    let state = common::test_state(pool.clone());

    let err = roles::create(
        State(state),
        Extension(fx.identity),
        Json(RolePayload {
            name: "Warehouse".into(),
            description: None,
            permissions: vec![1, 9999],
        }),
    )
    .await
    .expect_err("unknown permission id must be rejected");
    assert_eq!(err.code, ErrorCode::InvalidRequest);

    // Nothing was left behind
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM admin_roles WHERE name = 'Warehouse'")
            .fetch_one(&pool)
            .await
            .expect("role count");
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn duplicate_permission_ids_are_mapped_once(pool: PgPool) {
    let fx = common::seed_base(&pool).await;
    let state = common::test_state(pool.clone());

    let Json(created) = roles::create(
        State(state),
        Extension(fx.identity),
        Json(RolePayload {
            name: "Support".into(),
            description: Some("Customer support".into()),
            permissions: vec![1, 1, 2],
        }),
    )
    .await
    .expect("create role");

    assert_eq!(created.permissions.len(), 2);

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM role_permissions WHERE role_id = $1")
            .bind(created.role.id)
            .fetch_one(&pool)
            .await
            .expect("mapping count");
    assert_eq!(count, 2);
}

#[sqlx::test]
async fn updating_a_role_with_unknown_permission_id_changes_nothing(pool: PgPool) {
    let fx = common::seed_base(&pool).await;
    let state = common::test_state(pool.clone());

    let Json(created) = roles::create(
        State(state.clone()),
        Extension(fx.identity.clone()),
        Json(RolePayload {
            name: "Catalog".into(),
            description: None,
            permissions: vec![3],
        }),
    )
    .await
    .expect("create role");

    let err = roles::update(
        State(state),
        Extension(fx.identity),
        Path(created.role.id),
        Json(RolePayload {
            name: "Catalog v2".into(),
            description: None,
            permissions: vec![3, 9999],
        }),
    )
    .await
    .expect_err("unknown permission id must be rejected");
    assert_eq!(err.code, ErrorCode::InvalidRequest);

    // The transaction rolled back both the rename and the remapping
    let (name,): (String,) = sqlx::query_as("SELECT name FROM admin_roles WHERE id = $1")
        .bind(created.role.id)
        .fetch_one(&pool)
        .await
        .expect("role name");
    assert_eq!(name, "Catalog");

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM role_permissions WHERE role_id = $1")
            .bind(created.role.id)
            .fetch_one(&pool)
            .await
            .expect("mapping count");
    assert_eq!(count, 1);
}
