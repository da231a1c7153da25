use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tower_http::trace::TraceLayer;
use tracing::info;

use paydesk_api::sessions::SessionStore;
use paydesk_api::{AppState, AppStateInner};
use paydesk_db::PaymentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paydesk=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("PAYDESK_DB_PATH").unwrap_or_else(|_| "paydesk.db".into());
    let templates_dir =
        std::env::var("PAYDESK_TEMPLATES_DIR").unwrap_or_else(|_| "templates".into());
    let host = std::env::var("PAYDESK_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PAYDESK_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;

    // Init database
    let db = paydesk_db::Database::open(&PathBuf::from(&db_path))?;

    // Provision the admin login when configured; the digest matches what the
    // login handler computes.
    if let (Ok(login), Ok(password)) = (
        std::env::var("PAYDESK_ADMIN_LOGIN"),
        std::env::var("PAYDESK_ADMIN_PASSWORD"),
    ) {
        let digest = hex::encode(Sha256::digest(password.as_bytes()));
        db.upsert_user(&login, &digest)?;
        info!("admin user '{}' provisioned", login);
    }

    let templates = tera::Tera::new(&format!("{templates_dir}/**/*"))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        store: Arc::new(db),
        sessions: SessionStore::new(),
        templates,
    });

    let app = paydesk_api::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("Paydesk server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
