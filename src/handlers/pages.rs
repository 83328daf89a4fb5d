use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use serde_json::json;

use crate::error::AppError;
use crate::money;
use crate::state::AppState;

/// Values every page gets: the client-side scripts need the API base URL and
/// the publishable key (never the secret key).
fn page_defaults(state: &AppState) -> Vec<(&'static str, String)> {
    vec![
        ("api_url", state.config.server.api_url.clone()),
        ("publishable_key", state.config.stripe.publishable_key.clone()),
    ]
}

/// GET / - storefront landing page
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let page = state.templates.render("home", &page_defaults(&state))?;
    Ok(Html(page))
}

/// GET /virtual-terminal - manual charge entry for staff
pub async fn virtual_terminal(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let page = state.templates.render("terminal", &page_defaults(&state))?;
    Ok(Html(page))
}

/// GET /widget/:id - product page for a one-off charge
pub async fn buy_once(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let widget = state.store.get_widget(id).await?;

    let mut data = page_defaults(&state);
    data.push(("widget_id", widget.id.to_string()));
    data.push(("widget_name", widget.name));
    data.push(("widget_description", widget.description));
    data.push(("widget_price", money::format_minor_units(widget.price)));
    data.push(("widget_image", widget.image));

    let page = state.templates.render("buy-once", &data)?;
    Ok(Html(page))
}

/// GET /health - liveness plus database reachability
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "version": env!("CARGO_PKG_VERSION"),
                "database_error": e.to_string()
            })),
        ),
    }
}
