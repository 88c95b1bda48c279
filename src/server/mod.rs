//! Single-route HTTP responder for a rendered document.
//!
//! The document is rendered once before the listener starts and is never
//! modified afterwards; each request gets a cheap clone of the same buffer.

use crate::error::{Result, TorrentJsonError};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Configuration for the document server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub bind_address: SocketAddr,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// Router serving `document` at `/`
pub fn router(document: Bytes) -> Router {
    Router::new()
        .route("/", get(serve_document))
        .with_state(document)
}

async fn serve_document(State(document): State<Bytes>) -> impl IntoResponse {
    debug!("Serving document ({} bytes)", document.len());
    ([(header::CONTENT_TYPE, "application/json")], document)
}

/// Bind to the configured address and serve until the process exits
pub async fn serve(config: &ServeConfig, document: Bytes) -> Result<()> {
    let listener = TcpListener::bind(config.bind_address)
        .await
        .map_err(|e| {
            TorrentJsonError::Server(format!("failed to bind {}: {}", config.bind_address, e))
        })?;

    serve_on(listener, document).await
}

/// Serve on an already bound listener
pub async fn serve_on(listener: TcpListener, document: Bytes) -> Result<()> {
    let address = listener.local_addr()?;
    info!("Your file is being served to: http://{}/", address);

    axum::serve(listener, router(document))
        .await
        .map_err(|e| TorrentJsonError::Server(e.to_string()))
}
