pub mod cards;
pub mod checkout;
pub mod config;
pub mod error;
pub mod handlers;
pub mod money;
pub mod render;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the storefront router over the injected application state.
pub fn app(state: Arc<AppState>) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/virtual-terminal", get(handlers::pages::virtual_terminal))
        .route("/widget/:id", get(handlers::pages::buy_once))
        .route("/payment-succeeded", post(handlers::checkout::payment_succeeded))
        .route("/health", get(handlers::pages::health))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
