use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tera::Context;

use paydesk_types::api::BankPaymentOrderRequest;

use crate::error::ApiError;
use crate::AppState;

const ATTACHMENT_NAME: &str = "internet_bank_payment.txt";

/// Render the bank payment order template with the submitted fields and
/// return it as a file download. Fields are passed through untouched;
/// absent ones render empty.
pub async fn internet_bank_payment(
    State(state): State<AppState>,
    Json(req): Json<BankPaymentOrderRequest>,
) -> Result<Response, ApiError> {
    let mut ctx = Context::new();
    ctx.insert("payment_from", &req.payment_from.unwrap_or_default());
    ctx.insert("bic", &req.bic.unwrap_or_default());
    ctx.insert("account_number", &req.account_number.unwrap_or_default());
    ctx.insert("comment", &req.comment.unwrap_or_default());
    ctx.insert(
        "amount",
        &req.amount.unwrap_or_else(|| Value::String(String::new())),
    );

    let body = state.templates.render("internet_bank_payment.txt", &ctx)?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={ATTACHMENT_NAME}"),
            ),
        ],
        body,
    )
        .into_response())
}
