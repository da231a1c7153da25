use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use paydesk_db::StoreError;
use paydesk_types::api::ErrorEnvelope;
use paydesk_types::query::QueryError;

/// The only failure text that ever crosses the wire.
pub const GENERIC_ERROR: &str = "Something wrong";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("payment {0} not found")]
    NotFound(i64),
    #[error("blocking task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
}

impl ApiError {
    pub fn missing_field(field: &str) -> Self {
        ApiError::MalformedInput(format!("missing field `{field}`"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MalformedInput(_) | ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::TaskJoin(_) | ApiError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Detail stays in the logs; the client gets the opaque envelope.
        match &self {
            ApiError::MalformedInput(_) | ApiError::Query(_) | ApiError::NotFound(_) => {
                warn!("request rejected: {self}");
            }
            ApiError::Store(_) | ApiError::TaskJoin(_) | ApiError::Template(_) => {
                error!("request failed: {self}");
            }
        }

        (
            status,
            Json(ErrorEnvelope {
                error: GENERIC_ERROR.to_string(),
            }),
        )
            .into_response()
    }
}
