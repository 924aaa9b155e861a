//! docguard-api - HTTP API server for the docguard pipeline.

mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use docguard_inference::{
    CompletionThrottle, HttpCompletionBackend, HttpOcrBackend, ThrottleConfig,
};
use docguard_pipeline::{EmailSyncService, ScanService};
use docguard_store::{CountCache, Storage};

use error::ApiError;
use handlers::{alerts, documents, emails, folders, scan, settings, stacks};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "docguard_api=info,docguard_pipeline=info,docguard_store=info,docguard_inference=info"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Backend selection happens exactly once, here. Everything downstream
    // receives the Storage explicitly; there is no global mode flag.
    let storage = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = docguard_store::create_pool(&url).await?;
            docguard_store::migrate(&pool).await?;
            info!("using PostgreSQL storage backend");
            Storage::new_pg(pool)
        }
        Err(_) => {
            warn!("DATABASE_URL not set, using in-memory storage (demo mode)");
            Storage::local()
        }
    };

    let completion = Arc::new(HttpCompletionBackend::from_env());
    let throttle_config = match std::env::var("DOCGUARD_THROTTLE_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
    {
        Some(ms) => ThrottleConfig::default().with_min_interval(Duration::from_millis(ms)),
        None => ThrottleConfig::default(),
    };
    let throttle = CompletionThrottle::spawn(completion, throttle_config);

    let ocr = Arc::new(HttpOcrBackend::from_env());

    let scan_service = Arc::new(ScanService::new(storage.clone(), throttle.clone(), ocr));
    let email_service = Arc::new(EmailSyncService::new(storage.clone(), throttle));

    let app_state = AppState {
        storage,
        scan: scan_service,
        email_sync: email_service,
        counts: CountCache::new(),
    };

    let app = router(app_state);

    let port = std::env::var("DOCGUARD_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(docguard_core::defaults::SERVER_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "docguard-api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scan", post(scan::scan_document))
        .route("/documents", get(documents::list_documents))
        .route("/documents/:id", get(documents::get_document))
        .route("/documents/:id", delete(documents::delete_document_handler))
        .route("/documents/:id/paid", post(documents::mark_document_paid))
        .route(
            "/documents/:id/archive",
            post(documents::archive_document_handler),
        )
        .route("/folders", get(folders::list_folders))
        .route("/folders", post(folders::create_folder))
        .route("/folders/:id", delete(folders::delete_folder_handler))
        .route("/stacks", get(stacks::list_stacks))
        .route("/stacks", post(stacks::create_stack))
        .route("/stacks/:id", delete(stacks::delete_stack_handler))
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/:id/dismiss", post(alerts::dismiss_alert))
        .route("/settings", get(settings::get_settings))
        .route("/settings", put(settings::update_settings))
        .route("/emails/sync", post(emails::sync_emails))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn health() -> Result<axum::Json<serde_json::Value>, ApiError> {
    Ok(axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
