// HTTP request handlers

use super::routes::AppState;
use crate::cache::ResponseSnapshot;
use crate::error::ProxyError;
use crate::net::FetchRequest;
use crate::worker::{Event, Outcome, Phase};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::Uri;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Request bodies larger than this are rejected before being forwarded.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // Check worker lifecycle phase
    let phase = state.worker.phase().await;
    let lifecycle_check = if phase == Phase::Active {
        HealthCheck {
            status: "ok".to_string(),
            message: "Worker active".to_string(),
        }
    } else {
        overall_status = HealthStatus::Degraded;
        HealthCheck {
            status: "warning".to_string(),
            message: format!("Worker phase: {:?}", phase),
        }
    };
    checks.insert("lifecycle".to_string(), lifecycle_check);

    // Check cache activity
    let stats = state.worker.stats().await;
    let cache_check = HealthCheck {
        status: "ok".to_string(),
        message: format!(
            "Namespace {}: {} hits, {} misses, {} writes, {} bypassed",
            state.worker.namespace(),
            stats.hits,
            stats.misses,
            stats.writes,
            stats.bypassed
        ),
    };
    checks.insert("cache".to_string(), cache_check);

    // Check configuration
    let config_check = HealthCheck {
        status: "ok".to_string(),
        message: format!("Upstream origin: {}", state.config.upstream.origin),
    };
    checks.insert("configuration".to_string(), config_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Catch-all handler: every inbound request becomes a `RequestReceived`
/// event. Origin-form URIs are joined onto the configured upstream origin;
/// absolute-form URIs (proxy-style requests for third-party origins) are
/// kept as-is so the allowlist can see the real host.
pub async fn proxy_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();

    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ProxyError::InvalidRequest(format!("Failed to read request body: {}", e)))?;

    let url = upstream_url(&state.config.upstream.origin, &parts.uri);
    debug!("Intercepting {} {}", parts.method, url);

    let fetch_request = FetchRequest {
        method: parts.method,
        url,
        headers: parts.headers,
        body,
    };

    match state
        .worker
        .dispatch(Event::RequestReceived(fetch_request))
        .await?
    {
        // Dropping the cache-write handle detaches the write; it finishes
        // off the response path.
        Outcome::Response(handled) => snapshot_response(handled.response),
        _ => Err(ProxyError::Internal(
            "Unexpected outcome for fetch event".to_string(),
        )),
    }
}

fn upstream_url(origin: &str, uri: &Uri) -> String {
    if uri.scheme().is_some() {
        return uri.to_string();
    }
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    format!("{}{}", origin.trim_end_matches('/'), path)
}

fn snapshot_response(snapshot: ResponseSnapshot) -> Result<Response, ProxyError> {
    let mut builder = Response::builder().status(snapshot.status);
    if let Some(headers) = builder.headers_mut() {
        *headers = snapshot.headers;
    }
    builder
        .body(Body::from(snapshot.body))
        .map_err(|e| ProxyError::Internal(format!("Failed to build response: {}", e)))
}
