use anomaly_core::{
    AdapterError, CoreResponse, DEFAULT_JOB_ID, HistoricalWeather, HttpHandler, PlatformAdapter,
};
use anyhow::Context;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::Value;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::unix::{self, SignalKind};
use tower_http::trace::TraceLayer;

pub fn router<P: HistoricalWeather + 'static>(handler: HttpHandler<P>) -> Router {
    Router::new()
        .route("/", post(invoke::<P>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(handler))
}

pub async fn serve<P: HistoricalWeather + 'static>(
    handler: HttpHandler<P>,
    bind: SocketAddr,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("error binding to address {bind}"))?;

    tracing::info!(message = "server started", address = %bind);

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(async {
            // Wait for either SIGTERM or SIGINT to shutdown
            tokio::select! {
                _ = sigterm() => {}
                _ = sigint() => {}
            }
        })
        .await
        .context("server error")?;

    tracing::info!("server shutdown");
    Ok(())
}

async fn invoke<P: HistoricalWeather + 'static>(
    State(handler): State<Arc<HttpHandler<P>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let res = match body {
        Ok(Json(input)) => handler.invoke(input).await,
        Err(rejection) => {
            tracing::debug!(message = "rejected request body", error = %rejection);
            CoreResponse::failure(
                Value::String(DEFAULT_JOB_ID.to_string()),
                &AdapterError::Validation(rejection.body_text()),
            )
        }
    };

    let status = StatusCode::from_u16(res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(res.body))
}

async fn health() -> &'static str {
    "ok"
}

/// Return after the first SIGTERM signal received by this process
async fn sigterm() -> io::Result<()> {
    unix::signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

/// Return after the first SIGINT signal received by this process
async fn sigint() -> io::Result<()> {
    unix::signal(SignalKind::interrupt())?.recv().await;
    Ok(())
}
