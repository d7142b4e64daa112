// Shared test doubles: scripted transport, recording host, worker rig
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use shellproxy::cache::{CacheStore, MemoryStore, ResponseSnapshot};
use shellproxy::config::AppConfig;
use shellproxy::error::{ProxyError, Result};
use shellproxy::net::{FetchRequest, Transport};
use shellproxy::worker::{HostRuntime, ProxyWorker};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub fn snapshot(status: u16, body: &str) -> ResponseSnapshot {
    ResponseSnapshot::new(
        StatusCode::from_u16(status).unwrap(),
        HeaderMap::new(),
        Bytes::copy_from_slice(body.as_bytes()),
    )
}

/// Transport that replays scripted responses and can simulate being offline.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<String, ResponseSnapshot>>,
    failing: Mutex<HashSet<String>>,
    offline: AtomicBool,
    fetches: AtomicU64,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), snapshot(status, body));
    }

    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn fetch(&self, request: &FetchRequest) -> Result<ResponseSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.offline.load(Ordering::SeqCst) {
            return Err(ProxyError::Network(format!(
                "network unreachable: {}",
                request.url
            )));
        }
        if self.failing.lock().unwrap().contains(&request.url) {
            return Err(ProxyError::Network(format!(
                "connection refused: {}",
                request.url
            )));
        }

        match self.responses.lock().unwrap().get(&request.url) {
            Some(scripted) => Ok(scripted.clone()),
            None => Ok(snapshot(404, "not found")),
        }
    }
}

/// Host runtime that records lifecycle signals.
#[derive(Default)]
pub struct RecordingHost {
    skip_waiting_calls: AtomicU64,
    claim_calls: AtomicU64,
}

impl RecordingHost {
    pub fn skip_waiting_calls(&self) -> u64 {
        self.skip_waiting_calls.load(Ordering::SeqCst)
    }

    pub fn claim_calls(&self) -> u64 {
        self.claim_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostRuntime for RecordingHost {
    fn skip_waiting(&self) {
        self.skip_waiting_calls.fetch_add(1, Ordering::SeqCst);
    }

    async fn claim_clients(&self) {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A worker wired to in-memory fakes, with handles kept for assertions.
pub struct TestRig {
    pub store: Arc<MemoryStore>,
    pub transport: Arc<FakeTransport>,
    pub host: Arc<RecordingHost>,
    pub worker: ProxyWorker,
}

pub const ORIGIN: &str = "http://app.local";

pub fn rig(namespace: &str) -> TestRig {
    let mut config = AppConfig::default();
    config.cache.namespace = namespace.to_string();
    config.upstream.origin = ORIGIN.to_string();

    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(FakeTransport::new());
    let host = Arc::new(RecordingHost::default());

    let worker = ProxyWorker::new(
        &config,
        Arc::clone(&store) as Arc<dyn CacheStore>,
        Arc::clone(&transport) as Arc<dyn Transport>,
        Arc::clone(&host) as Arc<dyn HostRuntime>,
    );

    TestRig {
        store,
        transport,
        host,
        worker,
    }
}

/// Script successful responses for the whole bootstrap set.
pub fn script_bootstrap(transport: &FakeTransport) {
    transport.respond(&format!("{}/", ORIGIN), 200, "<html>shell</html>");
    transport.respond(&format!("{}/index.html", ORIGIN), 200, "<html>shell</html>");
    transport.respond(&format!("{}/manifest.json", ORIGIN), 200, "{\"name\":\"tv\"}");
}
