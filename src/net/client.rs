// Live HTTP transport backed by reqwest

use crate::cache::models::ResponseSnapshot;
use crate::config::UpstreamConfig;
use crate::error::{ProxyError, Result};
use crate::net::{FetchRequest, Transport};
use async_trait::async_trait;
use hyper::header::{self, HeaderName};
use hyper::HeaderMap;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Hop-by-hop headers that describe a single connection, not the payload.
/// They are dropped when a response is snapshotted so a cached body replayed
/// later does not carry a stale transfer framing.
const HOP_BY_HOP: [HeaderName; 5] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// The live network collaborator.
///
/// Thin wrapper over a pooled reqwest client; carries no caching or retry
/// logic of its own. Failures surface as errors for the interceptor's
/// fallback path to observe.
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    /// Create a transport with connection pooling tuned from config.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(config.connection_pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP transport with connection pooling and keep-alive");

        Ok(Self { http_client })
    }

    fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
        let mut forwarded = HeaderMap::new();
        for (name, value) in headers {
            // reqwest sets its own Host and Content-Length
            if name == header::HOST || name == header::CONTENT_LENGTH {
                continue;
            }
            forwarded.append(name.clone(), value.clone());
        }
        forwarded
    }

    fn snapshot_headers(headers: &HeaderMap) -> HeaderMap {
        let mut kept = HeaderMap::new();
        for (name, value) in headers {
            if HOP_BY_HOP.contains(name) {
                continue;
            }
            kept.append(name.clone(), value.clone());
        }
        kept
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &FetchRequest) -> Result<ResponseSnapshot> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), request.url.as_str())
            .headers(Self::forwardable_headers(&request.headers));

        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await?;

        let status = response.status();
        let headers = Self::snapshot_headers(response.headers());
        let body = response.bytes().await?;

        debug!(
            "Fetched {} {} -> {} ({} bytes)",
            request.method,
            request.url,
            status,
            body.len()
        );

        Ok(ResponseSnapshot::new(status, headers, body))
    }
}
