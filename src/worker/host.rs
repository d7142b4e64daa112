// Host runtime collaborator

use async_trait::async_trait;
use tracing::debug;

/// The runtime hosting this proxy. The lifecycle handlers only consume these
/// signals as triggers; registration and update cadence belong to the host.
#[async_trait]
pub trait HostRuntime: Send + Sync {
    /// Signal that the freshly-installed version should start serving
    /// immediately instead of waiting for existing instances to wind down.
    fn skip_waiting(&self);

    /// Assert control over all currently-open client contexts without
    /// waiting for them to reload.
    async fn claim_clients(&self);
}

/// Host used by the standalone binary: there are no browser-style client
/// contexts to claim, so both signals reduce to log lines.
pub struct StandaloneHost;

#[async_trait]
impl HostRuntime for StandaloneHost {
    fn skip_waiting(&self) {
        debug!("skip_waiting: serving immediately");
    }

    async fn claim_clients(&self) {
        debug!("claim_clients: no client contexts to claim");
    }
}
