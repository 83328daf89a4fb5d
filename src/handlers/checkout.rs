use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Form;

use crate::checkout::PaymentConfirmation;
use crate::error::AppError;
use crate::state::AppState;

/// POST /payment-succeeded - reconcile a completed client-side authorization
/// and render the receipt.
pub async fn payment_succeeded(
    State(state): State<Arc<AppState>>,
    submission: Result<Form<PaymentConfirmation>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let Form(submission) =
        submission.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let receipt = state.checkout.confirm(submission).await?;

    let page = state.templates.render("succeeded", &receipt.values())?;
    Ok(Html(page))
}
