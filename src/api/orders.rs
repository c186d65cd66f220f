//! Order endpoints: listing, detail, status transitions

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AdminIdentity;
use crate::db;
use crate::email;
use crate::error::{AppError, ErrorCode, ServiceResult};
use crate::order_status::OrderStatus;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> ApiResult<Vec<db::orders::OrderSummary>> {
    tracing::debug!(user_id = identity.id, "Fetching orders");
    let orders = db::orders::list(&state.pool).await?;
    Ok(Json(orders))
}

#[derive(Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: db::orders::OrderCore,
    pub shipping_address: Option<db::orders::Address>,
    pub billing_address: Option<db::orders::Address>,
    pub items: Vec<db::orders::OrderItemDetail>,
    pub customer: Option<db::orders::CustomerProfile>,
    pub history: Vec<db::orders::HistoryEntry>,
}

#[derive(Serialize)]
pub struct OrderDetailResponse {
    pub order: OrderDetail,
}

/// GET /api/orders/{id}
///
/// Full envelope: order core, resolved addresses, denormalized items,
/// customer profile and ordered history. The four secondary reads are
/// independent, so they are issued concurrently.
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<OrderDetailResponse> {
    let order = db::orders::find_core(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let address_ids = [order.shipping_address_id, order.billing_address_id];
    let (addresses, items, customer, history) = tokio::try_join!(
        db::orders::find_addresses(&state.pool, &address_ids),
        db::orders::items_detailed(&state.pool, order_id),
        db::orders::customer_profile(&state.pool, order.user_id),
        db::orders::history(&state.pool, order_id),
    )?;

    let shipping_address = addresses
        .iter()
        .find(|a| a.id == order.shipping_address_id)
        .cloned();
    let billing_address = addresses
        .iter()
        .find(|a| a.id == order.billing_address_id)
        .cloned();

    Ok(Json(OrderDetailResponse {
        order: OrderDetail {
            order,
            shipping_address,
            billing_address,
            items,
            customer,
            history,
        },
    }))
}

#[derive(Deserialize)]
pub struct TransitionRequest {
    pub new_status: String,
    pub description: Option<String>,
    #[serde(default)]
    pub notify_customer: bool,
}

#[derive(Serialize)]
pub struct TransitionResponse {
    pub order: db::orders::OrderCore,
    pub history: Vec<db::orders::HistoryEntry>,
}

/// PATCH /api/orders/{id}/status
///
/// Runs the whole transition as one transaction: lock the order row,
/// validate the requested move, deduct inventory on the accept edge, append
/// the history entry, update the order. A stock shortfall aborts everything.
/// Customer notification happens after commit and is best-effort.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> ApiResult<TransitionResponse> {
    let requested = OrderStatus::parse(&req.new_status).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvalidOrderStatus,
            format!("Invalid order status: {}", req.new_status),
        )
    })?;

    let mut tx = state.pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to begin transaction");
        AppError::new(ErrorCode::InternalError)
    })?;

    let current_raw = db::orders::lock_status(&mut tx, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let current = OrderStatus::parse(&current_raw).ok_or_else(|| {
        tracing::error!(order_id = %order_id, status = %current_raw, "Order has unrecognized persisted status");
        AppError::new(ErrorCode::InternalError)
    })?;

    current.validate_transition(requested)?;

    if OrderStatus::deducts_inventory(current, requested) {
        let items = db::orders::item_quantities(&mut tx, order_id).await?;
        for item in &items {
            let deducted =
                db::inventory::decrement_if_available(&mut tx, item.variant_id, item.quantity)
                    .await
                    .map_err(crate::error::ServiceError::from)?;
            if !deducted {
                // Dropping the transaction rolls back earlier deductions
                return Err(AppError::with_message(
                    ErrorCode::InsufficientStock,
                    format!("Insufficient inventory for variant {}", item.variant_id),
                )
                .with_detail("variant_id", item.variant_id));
            }
        }
    }

    db::orders::append_history(
        &mut tx,
        order_id,
        current.as_str(),
        requested.as_str(),
        identity.id,
        req.description.as_deref(),
    )
    .await?;

    db::orders::update_status(&mut tx, order_id, requested.as_str(), req.description.as_deref())
        .await?;

    tx.commit().await.map_err(|e| {
        tracing::error!(order_id = %order_id, error = %e, "Failed to commit transition");
        AppError::new(ErrorCode::InternalError)
    })?;

    tracing::info!(
        order_id = %order_id,
        user_id = identity.id,
        from = current.as_str(),
        to = requested.as_str(),
        "Order status updated"
    );

    // Best-effort notification: a failure here never affects the response,
    // the committed transition is the source of truth.
    if req.notify_customer {
        let notify_state = state.clone();
        let note = req.description.clone();
        tokio::spawn(async move {
            if let Err(e) = notify_customer(&notify_state, order_id, requested, note).await {
                tracing::warn!(order_id = %order_id, error = ?e, "Status notification email failed");
            }
        });
    }

    let order = db::orders::find_core(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    let history = db::orders::history(&state.pool, order_id).await?;

    Ok(Json(TransitionResponse { order, history }))
}

async fn notify_customer(
    state: &AppState,
    order_id: Uuid,
    status: OrderStatus,
    note: Option<String>,
) -> ServiceResult<()> {
    let Some(recipient) = db::orders::customer_email(&state.pool, order_id).await? else {
        tracing::debug!(order_id = %order_id, "Order has no customer email, skipping notification");
        return Ok(());
    };

    let order_url = format!("{}/order?order_id={}", state.site_url, order_id);
    email::send_order_status(
        &state.ses,
        &state.ses_from_email,
        &recipient,
        order_id,
        status,
        note.as_deref(),
        &order_url,
    )
    .await?;
    Ok(())
}
