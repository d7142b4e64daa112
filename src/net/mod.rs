//! Network transport abstraction.
//!
//! The proxy never implements the transport itself: it consumes a single
//! fetch primitive. `HttpTransport` is the live reqwest-backed
//! implementation; tests substitute scripted fakes.

pub mod client;

pub use client::HttpTransport;

use crate::cache::models::{RequestIdentity, ResponseSnapshot};
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use hyper::{HeaderMap, Method};

/// An outbound request as observed by the interceptor.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchRequest {
    /// A bare GET with no headers or body.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// The (method, URL) identity this request is cached under.
    pub fn identity(&self) -> RequestIdentity {
        RequestIdentity {
            method: self.method.clone(),
            url: self.url.clone(),
        }
    }
}

/// The fetch primitive consumed by the handlers.
///
/// An `Err` means a fetch-level failure (unreachable host, DNS, timeout); a
/// response with a non-2xx status is still `Ok` and is the caller's to
/// interpret.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<ResponseSnapshot>;
}
