//! Cross-cutting helpers.
//!
//! # Submodules
//!
//! - `logging`: tracing subscriber initialization.

pub mod logging;
