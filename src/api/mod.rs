//! API routes for ferrum-admin

pub mod admins;
pub mod auth;
pub mod health;
pub mod orders;
pub mod roles;

use std::time::Duration;

use axum::routing::{get, patch, put};
use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{Permission, require_auth, require_permission};
use crate::error::AppError;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public: health check and login only
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/login", axum::routing::post(auth::login));

    let orders = Router::new()
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/{id}", get(orders::get_order))
        .route("/api/orders/{id}/status", patch(orders::update_status))
        .layer(middleware::from_fn(require_permission(&[
            Permission::ManageOrders,
        ])));

    let roles = Router::new()
        .route("/api/roles", get(roles::list).post(roles::create))
        .route("/api/roles/{id}", put(roles::update).delete(roles::delete))
        .layer(middleware::from_fn(require_permission(&[
            Permission::ManageAdmins,
        ])));

    let admins = Router::new()
        .route("/api/admins", get(admins::list).post(admins::create))
        .route("/api/admins/{id}", put(admins::update).delete(admins::delete))
        .layer(middleware::from_fn(require_permission(&[
            Permission::ManageAdmins,
        ])));

    // Every mutating route sits behind JWT auth + a permission layer
    let protected = Router::new()
        .merge(orders)
        .merge(roles)
        .merge(admins)
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(ConcurrencyLimitLayer::new(1024)),
        )
        .with_state(state)
}
