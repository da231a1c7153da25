pub mod admin;
pub mod documents;
pub mod error;
pub mod middleware;
pub mod payments;
pub mod sessions;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use paydesk_db::PaymentStore;

use crate::sessions::SessionStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn PaymentStore>,
    pub sessions: SessionStore,
    pub templates: tera::Tera,
}

/// The full route table. The JSON API is public; the admin pages behind
/// `/admin/*` run through the session middleware first.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/card_payment",
            post(payments::create_card_payment)
                .get(payments::list_card_payments)
                .patch(payments::patch_card_payment),
        )
        .route(
            "/api/requested_payment",
            post(payments::create_requested_payment).get(payments::list_requested_payments),
        )
        .route(
            "/api/internet_bank_payment",
            post(documents::internet_bank_payment),
        );

    let admin_public = Router::new()
        .route("/admin", get(admin::admin_page).post(admin::admin_login))
        .route("/admin/logout", get(admin::logout));

    let admin_gated = Router::new()
        .route("/admin/card_payments", get(admin::card_payments_page))
        .route(
            "/admin/requested_payments",
            get(admin::requested_payments_page),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    Router::new()
        .merge(api)
        .merge(admin_public)
        .merge(admin_gated)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
