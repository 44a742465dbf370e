//! Bounded-timeout network reachability check.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

/// Capability interface for the pre-attempt connectivity check.
pub trait ConnectivityProbe {
    /// True when the network looks reachable. Fails closed: any error,
    /// non-2xx response, or timeout reports unreachable.
    async fn is_reachable(&self) -> bool;
}

/// Probes reachability with a HEAD request to a known-stable host.
pub struct HttpProbe {
    client: Client,
    url: String,
}

impl HttpProbe {
    /// Total latency is bounded at ~6s: 5s request timeout on top of
    /// connection setup.
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(5))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }
}

impl ConnectivityProbe for HttpProbe {
    async fn is_reachable(&self) -> bool {
        match self.client.head(&self.url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("connectivity probe failed: {e}");
                false
            }
        }
    }
}
