use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use paydesk_db::PatchOutcome;
use paydesk_db::models::{CardPaymentRow, RequestedPaymentRow};
use paydesk_types::api::{
    CardPaymentView, CreateCardPaymentRequest, CreateRequestedPaymentRequest, ListEnvelope,
    OkEnvelope, PatchCardPaymentRequest, RequestedPaymentView,
};
use paydesk_types::models::{NewCardPayment, NewRequestedPayment};
use paydesk_types::month;
use paydesk_types::query::{QuerySpec, CARD_PAYMENT_FIELDS, REQUESTED_PAYMENT_FIELDS};

use crate::error::ApiError;
use crate::AppState;

const ISO_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub sort: Option<String>,
    pub field: Option<String>,
    pub filter: Option<String>,
}

// ── Card payments ───────────────────────────────────────────────────────

pub async fn create_card_payment(
    State(state): State<AppState>,
    Json(req): Json<CreateCardPaymentRequest>,
) -> Result<Json<OkEnvelope>, ApiError> {
    let payment = NewCardPayment {
        card_number: required(req.card_number, "card_number")?,
        amount: int_field(req.amount, "amount")?,
        card_ttl: month_field(req.card_ttl.as_deref(), "card_ttl")?,
        cvc: required(req.cvc, "cvc")?,
        comment: req.comment,
        email: required(req.email, "email")?,
    };

    let store = state.store.clone();
    let id = tokio::task::spawn_blocking(move || store.create_card_payment(&payment)).await??;

    info!(id, "card payment submitted");
    Ok(Json(OkEnvelope::ok()))
}

pub async fn list_card_payments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope<CardPaymentView>>, ApiError> {
    let result = fetch_card_payments(&state, &params).await?;
    Ok(Json(ListEnvelope { result }))
}

pub async fn patch_card_payment(
    State(state): State<AppState>,
    Json(req): Json<PatchCardPaymentRequest>,
) -> Result<Json<OkEnvelope>, ApiError> {
    let id = int_field(req.payment_id, "payment_id")?;
    // `notSafe` is inverted on arrival: absent or falsy means safe.
    let is_safe = !req.not_safe.as_ref().is_some_and(truthy);

    let store = state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || store.patch_card_payment(id, is_safe)).await??;

    match outcome {
        PatchOutcome::Updated => {
            info!(id, is_safe, "payment review recorded");
            Ok(Json(OkEnvelope::ok()))
        }
        PatchOutcome::NotFound => Err(ApiError::NotFound(id)),
    }
}

/// Shared by the JSON list endpoint and the admin HTML table.
pub(crate) async fn fetch_card_payments(
    state: &AppState,
    params: &ListParams,
) -> Result<Vec<CardPaymentView>, ApiError> {
    let spec = QuerySpec::from_params(
        params.sort.as_deref(),
        params.filter.as_deref(),
        params.field.as_deref(),
        &CARD_PAYMENT_FIELDS,
    )?;

    let store = state.store.clone();
    let rows = tokio::task::spawn_blocking(move || store.list_card_payments(&spec)).await??;

    Ok(rows.into_iter().map(card_payment_view).collect())
}

// ── Requested payments ──────────────────────────────────────────────────

pub async fn create_requested_payment(
    State(state): State<AppState>,
    Json(req): Json<CreateRequestedPaymentRequest>,
) -> Result<Json<OkEnvelope>, ApiError> {
    let payment = NewRequestedPayment {
        tax: required(req.tax, "tax")?,
        bic: required(req.bic, "bic")?,
        account_number: required(req.account_number, "account_number")?,
        phone: required(req.phone, "phone")?,
        amount: int_field(req.amount, "amount")?,
        comment: req.comment,
        email: required(req.email, "email")?,
    };

    let store = state.store.clone();
    let id = tokio::task::spawn_blocking(move || store.create_requested_payment(&payment)).await??;

    info!(id, "requested payment submitted");
    Ok(Json(OkEnvelope::ok()))
}

pub async fn list_requested_payments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope<RequestedPaymentView>>, ApiError> {
    let result = fetch_requested_payments(&state, &params).await?;
    Ok(Json(ListEnvelope { result }))
}

pub(crate) async fn fetch_requested_payments(
    state: &AppState,
    params: &ListParams,
) -> Result<Vec<RequestedPaymentView>, ApiError> {
    let spec = QuerySpec::from_params(
        params.sort.as_deref(),
        params.filter.as_deref(),
        params.field.as_deref(),
        &REQUESTED_PAYMENT_FIELDS,
    )?;

    let store = state.store.clone();
    let rows = tokio::task::spawn_blocking(move || store.list_requested_payments(&spec)).await??;

    Ok(rows.into_iter().map(requested_payment_view).collect())
}

// ── Response assembly ───────────────────────────────────────────────────

fn card_payment_view(row: CardPaymentRow) -> CardPaymentView {
    let id = row.id;
    let card_ttl = row.card_ttl.and_then(|raw| match NaiveDate::parse_from_str(&raw, ISO_DATE) {
        Ok(date) => Some(month::render_month(date)),
        Err(e) => {
            warn!("corrupt card_ttl '{}' on payment {}: {}", raw, id, e);
            None
        }
    });

    CardPaymentView {
        id,
        card_number: row.card_number,
        amount: row.amount,
        card_ttl,
        cvc: row.cvc,
        comment: row.comment,
        email: row.email,
        is_safe: row.is_safe,
    }
}

fn requested_payment_view(row: RequestedPaymentRow) -> RequestedPaymentView {
    RequestedPaymentView {
        id: row.id,
        tax: row.tax,
        bic: row.bic,
        phone: row.phone,
        account_number: row.account_number,
        comment: row.comment,
        email: row.email,
        amount: row.amount,
    }
}

// ── Field coercion helpers ──────────────────────────────────────────────

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::missing_field(field))
}

/// Integer-cast semantics: a JSON integer or a numeric string both pass,
/// anything else is malformed. Absence never defaults to zero.
fn int_field(value: Option<Value>, field: &str) -> Result<i64, ApiError> {
    let value = value.ok_or_else(|| ApiError::missing_field(field))?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ApiError::MalformedInput(format!("field `{field}` is not an integer: {value}"))
    })
}

fn month_field(value: Option<&str>, field: &str) -> Result<NaiveDate, ApiError> {
    let raw = value.ok_or_else(|| ApiError::missing_field(field))?;
    month::parse_month(raw).ok_or_else(|| {
        ApiError::MalformedInput(format!("field `{field}` must match MM.YYYY, got `{raw}`"))
    })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
