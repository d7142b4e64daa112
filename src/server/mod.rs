//! Axum-based HTTP front for the proxy worker.
//!
//! This is the host-runtime glue: it turns inbound HTTP requests into fetch
//! events for the worker and exposes a health endpoint reporting lifecycle
//! phase and cache activity.
//!
//! # Components
//!
//! - `handlers`: the catch-all interception handler and the health endpoint.
//! - `routes`: router configuration with tracing and request-id layers.

mod handlers;
mod routes;

pub use routes::{create_router, AppState};
