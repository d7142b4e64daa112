// Network-first-with-fallback and allowlist passthrough tests

mod common;

use bytes::Bytes;
use common::{rig, TestRig, ORIGIN};
use hyper::Method;
use shellproxy::cache::{CacheStore, RequestIdentity};
use shellproxy::error::Result;
use shellproxy::net::FetchRequest;
use shellproxy::worker::{Event, Handled, Outcome};

async fn dispatch_fetch(rig: &TestRig, request: FetchRequest) -> Result<Handled> {
    match rig.worker.dispatch(Event::RequestReceived(request)).await? {
        Outcome::Response(handled) => Ok(handled),
        _ => panic!("fetch event produced a lifecycle outcome"),
    }
}

fn post(url: &str) -> FetchRequest {
    let mut request = FetchRequest::get(url);
    request.method = Method::POST;
    request.body = Bytes::from_static(b"{}");
    request
}

#[tokio::test]
async fn test_successful_get_returns_live_response_and_caches_it() {
    let rig = rig("v2");
    let url = format!("{}/videos.json", ORIGIN);
    rig.transport.respond(&url, 200, "[1,2,3]");

    let handled = dispatch_fetch(&rig, FetchRequest::get(url.as_str())).await.unwrap();
    assert_eq!(handled.response.body, Bytes::from_static(b"[1,2,3]"));

    // The write happens off the response path; await it before looking
    handled.cache_write.unwrap().await.unwrap();

    let cached = rig
        .store
        .lookup("v2", &RequestIdentity::get(url.as_str()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.body, Bytes::from_static(b"[1,2,3]"));
    assert_eq!(rig.worker.stats().await.writes, 1);
}

#[tokio::test]
async fn test_network_failure_falls_back_to_warm_cache() {
    let rig = rig("v2");
    let url = format!("{}/videos.json", ORIGIN);
    rig.transport.respond(&url, 200, "[1,2,3]");

    let handled = dispatch_fetch(&rig, FetchRequest::get(url.as_str())).await.unwrap();
    handled.cache_write.unwrap().await.unwrap();

    rig.transport.set_offline(true);

    let handled = dispatch_fetch(&rig, FetchRequest::get(url.as_str())).await.unwrap();
    assert_eq!(handled.response.body, Bytes::from_static(b"[1,2,3]"));
    assert!(handled.cache_write.is_none());
    assert_eq!(rig.worker.stats().await.hits, 1);
}

#[tokio::test]
async fn test_network_failure_with_cold_cache_propagates_the_error() {
    let rig = rig("v2");
    rig.transport.set_offline(true);

    let err = dispatch_fetch(&rig, FetchRequest::get(format!("{}/videos.json", ORIGIN)))
        .await
        .unwrap_err();
    assert!(err.is_fetch_failure());
    assert_eq!(rig.worker.stats().await.misses, 1);
}

#[tokio::test]
async fn test_non_ok_response_is_returned_but_never_cached() {
    let rig = rig("v2");
    let url = format!("{}/gone.json", ORIGIN);
    rig.transport.respond(&url, 404, "not found");

    let handled = dispatch_fetch(&rig, FetchRequest::get(url.as_str())).await.unwrap();
    assert_eq!(handled.response.status.as_u16(), 404);
    assert!(handled.cache_write.is_none());
    assert!(rig
        .store
        .lookup("v2", &RequestIdentity::get(url.as_str()))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_non_get_requests_are_never_cached() {
    let rig = rig("v2");
    let url = format!("{}/playlist", ORIGIN);
    rig.transport.respond(&url, 200, "created");

    let handled = dispatch_fetch(&rig, post(&url)).await.unwrap();
    assert_eq!(handled.response.body, Bytes::from_static(b"created"));
    assert!(handled.cache_write.is_none());
    assert_eq!(rig.store.len("v2").await, None);
}

#[tokio::test]
async fn test_non_get_network_failure_has_no_fallback() {
    let rig = rig("v2");
    let url = format!("{}/playlist", ORIGIN);

    // Even a cached GET for the same URL must not satisfy a POST
    rig.store
        .put("v2", RequestIdentity::get(url.as_str()), common::snapshot(200, "stale"))
        .await
        .unwrap();
    rig.transport.set_offline(true);

    let err = dispatch_fetch(&rig, post(&url)).await.unwrap_err();
    assert!(err.is_fetch_failure());
}

#[tokio::test]
async fn test_repeated_get_overwrites_in_place() {
    let rig = rig("v2");
    let url = format!("{}/feed.json", ORIGIN);

    rig.transport.respond(&url, 200, "first");
    let handled = dispatch_fetch(&rig, FetchRequest::get(url.as_str())).await.unwrap();
    handled.cache_write.unwrap().await.unwrap();

    rig.transport.respond(&url, 200, "second");
    let handled = dispatch_fetch(&rig, FetchRequest::get(url.as_str())).await.unwrap();
    handled.cache_write.unwrap().await.unwrap();

    assert_eq!(rig.store.len("v2").await, Some(1));
    let cached = rig
        .store
        .lookup("v2", &RequestIdentity::get(url.as_str()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.body, Bytes::from_static(b"second"));
}

#[tokio::test]
async fn test_allowlisted_requests_bypass_the_cache_entirely() {
    let rig = rig("v2");
    let url = "https://i.ytimg.com/vi/abc/hqdefault.jpg";
    rig.transport.respond(url, 200, "jpeg-bytes");

    let handled = dispatch_fetch(&rig, FetchRequest::get(url)).await.unwrap();
    assert_eq!(handled.response.body, Bytes::from_static(b"jpeg-bytes"));
    assert!(handled.cache_write.is_none());

    // Zero cache reads or writes: no namespace was ever touched
    assert!(rig.store.namespaces().await.unwrap().is_empty());
    assert_eq!(rig.transport.fetch_count(), 1);
    assert_eq!(rig.worker.stats().await.bypassed, 1);
}

#[tokio::test]
async fn test_allowlisted_failure_is_not_recovered_from_cache() {
    let rig = rig("v2");
    let url = "https://www.youtube.com/embed/abc";

    // A cached entry exists for the identity, but bypass must not see it
    rig.store
        .put("v2", RequestIdentity::get(url), common::snapshot(200, "stale"))
        .await
        .unwrap();
    rig.transport.set_offline(true);

    let err = dispatch_fetch(&rig, FetchRequest::get(url)).await.unwrap_err();
    assert!(err.is_fetch_failure());
}

#[tokio::test]
async fn test_concurrent_writes_to_one_identity_keep_a_single_entry() {
    let rig = rig("v2");
    let url = format!("{}/feed.json", ORIGIN);
    rig.transport.respond(&url, 200, "payload");

    let first = dispatch_fetch(&rig, FetchRequest::get(url.as_str())).await.unwrap();
    let second = dispatch_fetch(&rig, FetchRequest::get(url.as_str())).await.unwrap();

    // Last write wins, whatever the completion order
    first.cache_write.unwrap().await.unwrap();
    second.cache_write.unwrap().await.unwrap();

    assert_eq!(rig.store.len("v2").await, Some(1));
    assert_eq!(rig.worker.stats().await.writes, 2);
}
