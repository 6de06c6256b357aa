//! Storefront API: catalog browsing, session carts, checkout and order tracking over axum and
//! SeaORM.

pub mod audit;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, middleware::from_fn_with_state, routing::get};

use crate::{
    middleware::session::bind_session_cart,
    routes::{create_api_router, doc::scalar_docs, health},
    state::AppState,
};

/// The application router with state bound. Transport layers (tracing, limits, request ids)
/// are added by the binary.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(scalar_docs())
        .layer(from_fn_with_state(state.clone(), bind_session_cart))
        .with_state(state)
}
