// shellproxy - offline-first caching proxy for a single-page media app

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod net;
pub mod policy;
pub mod server;
pub mod utils;
pub mod worker;
