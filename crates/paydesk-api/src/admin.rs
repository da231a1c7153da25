use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use sha2::{Digest, Sha256};
use tera::Context;
use tracing::info;

use paydesk_types::api::LoginForm;
use paydesk_types::models::AdminUser;

use crate::error::ApiError;
use crate::middleware::SESSION_COOKIE;
use crate::payments::{fetch_card_payments, fetch_requested_payments, ListParams};
use crate::AppState;

/// Login page; shows the signed-in user when the `sid` cookie still
/// authenticates.
pub async fn admin_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, ApiError> {
    let mut ctx = Context::new();
    if let Some(user) = current_user(&state, &jar) {
        ctx.insert("user", &user);
    }
    Ok(Html(state.templates.render("admin.html", &ctx)?))
}

pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let (login, password) = match (non_empty(form.login), non_empty(form.password)) {
        (Some(login), Some(password)) => (login, password),
        _ => return render_login_error(&state, "Missing login or password"),
    };

    let digest = hex::encode(Sha256::digest(password.as_bytes()));
    let store = state.store.clone();
    let lookup_login = login.clone();
    let user =
        tokio::task::spawn_blocking(move || store.get_user(&lookup_login, &digest)).await??;

    let Some(user) = user else {
        return render_login_error(&state, "Wrong login or password!");
    };

    let user = AdminUser {
        id: user.id,
        login: user.login,
    };
    let token = state.sessions.issue(user.clone());
    info!(login = %user.login, "admin session opened");

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(time::Duration::hours(24))
        .build();
    let jar = jar.add(cookie);

    let mut ctx = Context::new();
    ctx.insert("user", &user);
    let page = state.templates.render("admin.html", &ctx)?;
    Ok((jar, Html(page)).into_response())
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());
    let live = token
        .as_deref()
        .and_then(|token| state.sessions.authenticate(token));

    match (token, live) {
        (Some(token), Some(user)) => {
            state.sessions.revoke(&token);
            info!(login = %user.login, "admin session closed");
            Redirect::temporary("/admin").into_response()
        }
        // no live session to revoke; just bounce back to the login page
        _ => Redirect::permanent("/admin").into_response(),
    }
}

pub async fn card_payments_page(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ApiError> {
    let card_payments = fetch_card_payments(&state, &params).await?;

    let mut ctx = Context::new();
    ctx.insert("user", &user);
    ctx.insert("card_payments", &card_payments);
    Ok(Html(state.templates.render("card_payments.html", &ctx)?))
}

pub async fn requested_payments_page(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, ApiError> {
    let requested_payments = fetch_requested_payments(&state, &params).await?;

    let mut ctx = Context::new();
    ctx.insert("user", &user);
    ctx.insert("requested_payments", &requested_payments);
    Ok(Html(
        state.templates.render("requested_payments.html", &ctx)?,
    ))
}

fn current_user(state: &AppState, jar: &CookieJar) -> Option<AdminUser> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.authenticate(cookie.value()))
}

fn render_login_error(state: &AppState, message: &str) -> Result<Response, ApiError> {
    let mut ctx = Context::new();
    ctx.insert("error", message);
    let page = state.templates.render("admin.html", &ctx)?;
    Ok(Html(page).into_response())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
