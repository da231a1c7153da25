use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;

pub const SESSION_COOKIE: &str = "sid";

/// Resolve the `sid` cookie against the session store and stash the admin
/// identity in request extensions; unauthenticated requests bounce to the
/// login surface before the route's own logic runs.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let user = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.authenticate(cookie.value()));

    match user {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => Redirect::temporary("/admin").into_response(),
    }
}
