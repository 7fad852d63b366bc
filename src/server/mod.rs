//! HTTP surface of the webhook receiver.

pub mod signature;
pub mod webhook;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::info;

use crate::error::AppResult;
use crate::services::SyncTrigger;

#[derive(Clone)]
pub struct AppState {
    pub webhook_secret: Arc<str>,
    pub trigger: Arc<dyn SyncTrigger>,
}

impl AppState {
    pub fn new(webhook_secret: &str, trigger: Arc<dyn SyncTrigger>) -> Self {
        Self {
            webhook_secret: Arc::from(webhook_secret),
            trigger,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook::webhook_handler))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn serve(port: u16, state: AppState) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Webhook listener running");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
