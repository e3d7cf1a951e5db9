//! HTTP server for browsing and editing the wiki

mod handlers;

use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::PageStore;
use crate::error::WikiError;
use crate::templates::{SiteData, TemplateRenderer};
use crate::Wiki;

/// Server state shared by all handlers, immutable after startup
pub struct AppState {
    store: PageStore,
    templates: TemplateRenderer,
    site: SiteData,
}

/// Build the router for a wiki
///
/// Templates are compiled here, so a broken template directory is reported
/// before the server starts listening.
pub fn router(wiki: &Wiki) -> crate::Result<Router> {
    let state = Arc::new(AppState {
        store: wiki.store(),
        templates: wiki.templates()?,
        site: wiki.site_data(),
    });

    let app = Router::new()
        .route("/", get(handlers::home))
        .route("/view/:title", get(handlers::view))
        .route("/edit/:title", get(handlers::edit))
        .route("/save/:title", post(handlers::save))
        .nest_service("/static", ServeDir::new(&wiki.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Start the wiki server
pub async fn start(wiki: &Wiki, ip: &str, port: u16) -> Result<()> {
    let app = router(wiki)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Wiki running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");
    tracing::info!("Serving pages from {:?}", wiki.pages_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WikiError::NotFound(_) => (StatusCode::NOT_FOUND, "Page not found"),
            WikiError::InvalidTitle(_) => (StatusCode::BAD_REQUEST, "Invalid page title"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        (status, message).into_response()
    }
}
