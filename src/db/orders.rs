//! Order, order item and status history queries
//!
//! `order_status_history` is append-only: this module only ever inserts into
//! it, and nothing in the service updates or deletes its rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::ServiceResult;

/// Row for the order list view
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: String,
    pub items_count: i64,
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<OrderSummary>> {
    let rows: Vec<OrderSummary> = sqlx::query_as(
        r#"
        SELECT o.id, o.created_at, o.total_amount, o.status, COUNT(oi.id) AS items_count
        FROM orders o
        LEFT JOIN order_items oi ON oi.order_id = o.id
        GROUP BY o.id
        ORDER BY o.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Core order fields as stored; tax columns depend on the GST regime
/// (CGST_SGST fills cgst/sgst, IGST fills igst).
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct OrderCore {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub subtotal: Decimal,
    pub gst_type: String,
    pub cgst_amount: Option<Decimal>,
    pub sgst_amount: Option<Decimal>,
    pub igst_amount: Option<Decimal>,
    pub total_amount: Decimal,
    pub payment_type: String,
    pub status: String,
    pub status_description: Option<String>,
    pub shipping_address_id: Uuid,
    pub billing_address_id: Uuid,
}

pub async fn find_core(pool: &PgPool, order_id: Uuid) -> ServiceResult<Option<OrderCore>> {
    let row: Option<OrderCore> = sqlx::query_as(
        r#"
        SELECT id, created_at, user_id, subtotal, gst_type,
               cgst_amount, sgst_amount, igst_amount, total_amount,
               payment_type, status, status_description,
               shipping_address_id, billing_address_id
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Lock the order row for the duration of a transition and read its status.
pub async fn lock_status(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
) -> ServiceResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
        .bind(order_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.map(|r| r.0))
}

#[derive(sqlx::FromRow)]
pub struct ItemQuantity {
    pub variant_id: i64,
    pub quantity: i32,
}

/// Items to deduct, in ascending variant id.
///
/// Every transition acquires variant row locks in this canonical order;
/// two concurrent acceptances sharing variants cannot deadlock on them.
pub async fn item_quantities(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
) -> ServiceResult<Vec<ItemQuantity>> {
    let rows: Vec<ItemQuantity> = sqlx::query_as(
        "SELECT variant_id, quantity FROM order_items WHERE order_id = $1 ORDER BY variant_id",
    )
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows)
}

pub async fn append_history(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    old_status: &str,
    new_status: &str,
    changed_by: i64,
    note: Option<&str>,
) -> ServiceResult<()> {
    sqlx::query(
        r#"
        INSERT INTO order_status_history (order_id, old_status, new_status, changed_by, note, changed_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        "#,
    )
    .bind(order_id)
    .bind(old_status)
    .bind(new_status)
    .bind(changed_by)
    .bind(note)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn update_status(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    status: &str,
    description: Option<&str>,
) -> ServiceResult<()> {
    sqlx::query("UPDATE orders SET status = $2, status_description = $3 WHERE id = $1")
        .bind(order_id)
        .bind(status)
        .bind(description)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[derive(serde::Serialize, sqlx::FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    pub order_id: Uuid,
    pub old_status: String,
    pub new_status: String,
    pub changed_by: i64,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// Full history, oldest first.
pub async fn history(pool: &PgPool, order_id: Uuid) -> ServiceResult<Vec<HistoryEntry>> {
    let rows: Vec<HistoryEntry> = sqlx::query_as(
        r#"
        SELECT id, order_id, old_status, new_status, changed_by, note, changed_at
        FROM order_status_history
        WHERE order_id = $1
        ORDER BY changed_at ASC, id ASC
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Line item with denormalized display names; price is the snapshot captured
/// at order time, not the variant's current price.
#[derive(serde::Serialize, sqlx::FromRow)]
pub struct OrderItemDetail {
    pub id: i64,
    pub product_name: String,
    pub variant_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

pub async fn items_detailed(pool: &PgPool, order_id: Uuid) -> ServiceResult<Vec<OrderItemDetail>> {
    let rows: Vec<OrderItemDetail> = sqlx::query_as(
        r#"
        SELECT oi.id, p.name AS product_name, pv.name AS variant_name, oi.quantity, oi.price
        FROM order_items oi
        JOIN products p ON p.id = oi.product_id
        JOIN product_variants pv ON pv.id = oi.variant_id
        WHERE oi.order_id = $1
        ORDER BY oi.id
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(Clone, serde::Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: Uuid,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
}

/// Shipping and billing reference the same address table, so both are
/// resolved with one id-keyed lookup.
pub async fn find_addresses(pool: &PgPool, ids: &[Uuid]) -> ServiceResult<Vec<Address>> {
    let rows: Vec<Address> = sqlx::query_as(
        "SELECT id, line1, line2, city, state, pincode, country FROM addresses WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(serde::Serialize, sqlx::FromRow)]
pub struct CustomerProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

pub async fn customer_profile(
    pool: &PgPool,
    user_id: Uuid,
) -> ServiceResult<Option<CustomerProfile>> {
    let row: Option<CustomerProfile> =
        sqlx::query_as("SELECT id, name, email, phone FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Email of the customer who owns the order, for status notifications.
pub async fn customer_email(pool: &PgPool, order_id: Uuid) -> ServiceResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT u.email
        FROM orders o
        JOIN users u ON u.id = o.user_id
        WHERE o.id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| r.0))
}
