use std::time::Duration;

use crate::foundation::error::{DocshotError, DocshotResult};

/// Upper bound on a single downloaded asset.
pub const MAX_ASSET_BYTES: u64 = 16 * 1024 * 1024;

/// Capability that retrieves the body of a URL.
pub trait Transport {
    /// Fetch `url` and return the full response body. Any non-success status is an error.
    fn get(&mut self, url: &str) -> DocshotResult<Vec<u8>>;
}

/// [`Transport`] over HTTP(S) using a blocking `ureq` agent.
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Build a transport whose requests fail after `timeout` overall.
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl Transport for HttpTransport {
    fn get(&mut self, url: &str) -> DocshotResult<Vec<u8>> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| DocshotError::fetch(format!("GET {url} failed: {e}")))?;

        response
            .body_mut()
            .with_config()
            .limit(MAX_ASSET_BYTES)
            .read_to_vec()
            .map_err(|e| DocshotError::fetch(format!("reading body of {url} failed: {e}")))
    }
}
