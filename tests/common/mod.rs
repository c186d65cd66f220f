//! Shared fixtures for the integration tests
//!
//! Each `#[sqlx::test]` gets its own freshly migrated database, so every
//! fixture row is seeded per test.

use std::collections::HashSet;

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::config::{BehaviorVersion, Region};
use sqlx::PgPool;
use uuid::Uuid;

use ferrum_admin::auth::{AdminIdentity, Permission};
use ferrum_admin::state::AppState;

/// AppState over the test pool. The SES client points at nothing and is
/// never invoked; tests do not request customer notifications.
pub fn test_state(pool: PgPool) -> AppState {
    let ses_config = aws_sdk_sesv2::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("eu-west-1"))
        .build();

    AppState {
        pool,
        ses: SesClient::from_conf(ses_config),
        ses_from_email: "orders@test.invalid".into(),
        site_url: "https://shop.test.invalid".into(),
        jwt_secret: "integration-test-secret".into(),
    }
}

pub struct Fixture {
    pub identity: AdminIdentity,
    pub customer_id: Uuid,
    pub address_id: Uuid,
}

/// Seed an acting admin, a customer and an address.
pub async fn seed_base(pool: &PgPool) -> Fixture {
    let (role_id,): (i64,) = sqlx::query_as(
        "INSERT INTO admin_roles (name, is_protected) VALUES ('Ops', false) RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("seed role");

    let (admin_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO admin_users (name, email, username, password_hash, role_id)
        VALUES ('Ops Admin', 'ops@test.invalid', 'ops', 'unused-hash', $1)
        RETURNING id
        "#,
    )
    .bind(role_id)
    .fetch_one(pool)
    .await
    .expect("seed admin");

    let (customer_id,): (Uuid,) =
        sqlx::query_as("INSERT INTO users (name, email) VALUES ('Customer', 'customer@test.invalid') RETURNING id")
            .fetch_one(pool)
            .await
            .expect("seed customer");

    let (address_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO addresses (user_id, line1, city, state, pincode, country)
        VALUES ($1, '1 Main St', 'Pune', 'MH', '411001', 'India')
        RETURNING id
        "#,
    )
    .bind(customer_id)
    .fetch_one(pool)
    .await
    .expect("seed address");

    let identity = AdminIdentity {
        id: admin_id,
        username: "ops".into(),
        role_id,
        permissions: HashSet::from([Permission::ManageOrders, Permission::ManageAdmins]),
    };

    Fixture {
        identity,
        customer_id,
        address_id,
    }
}

/// Seed a product with one variant at the given stock level.
pub async fn seed_variant(pool: &PgPool, name: &str, stock: i32) -> i64 {
    let (product_id,): (i64,) =
        sqlx::query_as("INSERT INTO products (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(pool)
            .await
            .expect("seed product");

    let (variant_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO product_variants (product_id, name, price, quantity)
        VALUES ($1, 'Default', 100.00, $2)
        RETURNING id
        "#,
    )
    .bind(product_id)
    .bind(stock)
    .fetch_one(pool)
    .await
    .expect("seed variant");

    variant_id
}

/// Seed a placed order with the given (variant_id, quantity) items, inserted
/// in the order given.
pub async fn seed_order(pool: &PgPool, fx: &Fixture, items: &[(i64, i32)]) -> Uuid {
    let (order_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO orders (user_id, subtotal, gst_type, igst_amount, total_amount,
                            payment_type, status, shipping_address_id, billing_address_id)
        VALUES ($1, 100.00, 'IGST', 18.00, 118.00, 'prepaid', 'Order placed', $2, $2)
        RETURNING id
        "#,
    )
    .bind(fx.customer_id)
    .bind(fx.address_id)
    .fetch_one(pool)
    .await
    .expect("seed order");

    for (variant_id, quantity) in items {
        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, product_id, variant_id, quantity, price)
            SELECT $1, product_id, id, $3, 100.00 FROM product_variants WHERE id = $2
            "#,
        )
        .bind(order_id)
        .bind(variant_id)
        .bind(quantity)
        .execute(pool)
        .await
        .expect("seed order item");
    }

    order_id
}

pub async fn stock_of(pool: &PgPool, variant_id: i64) -> i32 {
    let (quantity,): (i32,) =
        sqlx::query_as("SELECT quantity FROM product_variants WHERE id = $1")
            .bind(variant_id)
            .fetch_one(pool)
            .await
            .expect("variant stock");
    quantity
}

pub async fn status_of(pool: &PgPool, order_id: Uuid) -> String {
    let (status,): (String,) = sqlx::query_as("SELECT status FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_one(pool)
        .await
        .expect("order status");
    status
}

pub async fn history_len(pool: &PgPool, order_id: Uuid) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM order_status_history WHERE order_id = $1")
            .bind(order_id)
            .fetch_one(pool)
            .await
            .expect("history count");
    count
}
