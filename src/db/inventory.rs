//! Inventory ledger
//!
//! The conditional decrement below is the only statement in this service
//! that mutates variant stock. It runs inside the caller's transaction, so
//! a failed order transition leaves no partial deduction behind.

use sqlx::{Postgres, Transaction};

/// Atomically reduce a variant's stock by `quantity` if enough is available.
///
/// Returns `false` without touching the row when current stock < `quantity`.
/// The guard lives in the WHERE clause, so two concurrent acceptances of the
/// same variant cannot race it below zero.
pub async fn decrement_if_available(
    tx: &mut Transaction<'_, Postgres>,
    variant_id: i64,
    quantity: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE product_variants SET quantity = quantity - $2 WHERE id = $1 AND quantity >= $2",
    )
    .bind(variant_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() == 1)
}
