// HTTP routes configuration

use super::handlers::{health_handler, proxy_handler};
use crate::config::AppConfig;
use crate::error::Result;
use crate::worker::ProxyWorker;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub worker: Arc<ProxyWorker>,
}

pub fn create_router(config: AppConfig, worker: Arc<ProxyWorker>) -> Result<Router> {
    let state = AppState { config, worker };

    // Every path that is not an endpoint of ours is an interception
    // candidate, so the proxy handler hangs off the fallback.
    let app = Router::new()
        .route("/health", get(health_handler))
        .fallback(proxy_handler)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state);

    Ok(app)
}
