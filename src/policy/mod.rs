//! Request classification against the passthrough allowlist.
//!
//! Third-party origins the media app talks to directly (video hosting and
//! CDN, spreadsheet backend, font and asset CDNs) must never be intercepted,
//! cached, or rewritten. Classification runs before any other fetch logic so
//! allowlisted traffic is never observed by the caching path.

/// Host fragments whose requests fall through to default network handling.
///
/// Matching is plain substring search over the whole URL, mirroring the
/// deployed behavior. A URL that merely contains a fragment elsewhere (say in
/// a query parameter) also bypasses the cache; that false positive is a known
/// weakness kept for compatibility rather than silently tightening to
/// exact-host matching.
pub const BYPASS_HOSTS: [&str; 6] = [
    "youtube.com",
    "ytimg.com",
    "googlevideo.com",
    "googleapis.com",
    "google.com",
    "gstatic.com",
];

/// Outcome of classifying an outbound request URL.
///
/// Both variants are terminal decisions: `Bypass` traffic goes straight to
/// the network untouched, `Intercept` traffic enters the
/// network-first-with-fallback policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Pass through to default network handling, unobserved.
    Bypass,
    /// Apply the caching policy.
    Intercept,
}

/// Classify a request URL. Synchronous and side-effect-free.
pub fn classify(url: &str) -> Route {
    if BYPASS_HOSTS.iter().any(|host| url.contains(host)) {
        Route::Bypass
    } else {
        Route::Intercept
    }
}
