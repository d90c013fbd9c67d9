//! SlashGate development server.
//!
//! A local HTTP harness for a gateway that is normally driven by a
//! function host. It wraps each incoming HTTP request into a delivery
//! envelope (body base64-encoded, signature headers copied verbatim) and
//! serves the result back, so the platform's endpoint verification ping
//! can be exercised against a workstation before deploying.
//!
//! Only pings are answered (the default mux has no registered handlers);
//! applications embedding this crate wire their own mux and host.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use slashgate::{Config, Envelope, Gateway, Mux, SIGNATURE_HEADER, TIMESTAMP_HEADER};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("dev_server_starting");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(port = config.port, "config_loaded");

    let gateway = Arc::new(Gateway::from_config(&config, Mux::default()));

    let app = Router::new()
        .route("/health", get(health))
        .route("/", post(interactions))
        .layer(TraceLayer::new_for_http())
        .with_state(gateway);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "dev_server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("dev_server_shutdown_complete");

    Ok(())
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Interactions endpoint.
///
/// Rebuilds the delivery envelope a function host would construct: the raw
/// body is base64-encoded and the two signature headers are copied over
/// exactly as received.
async fn interactions(
    State(gateway): State<Arc<Gateway>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut envelope_headers = std::collections::HashMap::new();
    for name in [SIGNATURE_HEADER, TIMESTAMP_HEADER] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            envelope_headers.insert(name.to_string(), value.to_string());
        }
    }

    let envelope = Envelope {
        body: BASE64.encode(&body),
        headers: envelope_headers,
        is_base64_encoded: true,
    };

    match gateway.handle_envelope(envelope).await {
        Ok(result) if result.status_code == 200 => {
            info!("interaction_handled");
            (StatusCode::OK, Json(result.response)).into_response()
        }
        Ok(result) => {
            warn!(status_code = result.status_code, "interaction_rejected");
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(e) => {
            error!(error = %e, "interaction_processing_failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("dev_server_shutting_down");
}
