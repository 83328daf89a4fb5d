use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::cards::ProviderError;
use crate::checkout::CheckoutError;
use crate::render::RenderError;
use crate::store::StoreError;

/// Request-level error: maps the checkout taxonomy onto HTTP statuses and a
/// rendered error page. Failures never produce a blank response, and server
/// internals stay in the logs rather than the page.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Provider(ProviderError),
    Persistence(StoreError),
    NotFound(String),
    Render(RenderError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message for the error page.
    fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Provider(_) => {
                "We could not verify this payment with the card processor. \
                 No order was recorded; please contact support."
                    .to_string()
            }
            AppError::Persistence(_) => {
                "We could not record your order. No charge details were lost; \
                 please contact support before retrying."
                    .to_string()
            }
            AppError::NotFound(what) => format!("{} does not exist", what),
            AppError::Render(_) => "Something went wrong rendering this page.".to_string(),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Validation(msg) => AppError::Validation(msg),
            CheckoutError::Provider(e) => AppError::Provider(e),
            CheckoutError::Persistence(StoreError::NotFound(what)) => AppError::NotFound(what),
            CheckoutError::Persistence(e) => AppError::Persistence(e),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AppError::NotFound(what),
            other => AppError::Persistence(other),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::Validation(msg) => tracing::warn!(%status, "rejected submission: {}", msg),
            AppError::NotFound(what) => tracing::warn!(%status, "not found: {}", what),
            AppError::Provider(e) => tracing::error!(%status, "provider lookup failed: {}", e),
            AppError::Persistence(e) => tracing::error!(%status, "persistence failed: {}", e),
            AppError::Render(e) => tracing::error!(%status, "render failed: {}", e),
        }

        // The error page is compiled in so it renders even when the template
        // directory itself is the problem.
        let page = include_str!("../templates/error.html")
            .replace("{{status}}", status.as_str())
            .replace("{{message}}", &escape_html(&self.message()));
        (status, Html(page)).into_response()
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
