//! Fetching source data over HTTP(S).

use std::io::Read;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Result, ScoutError};

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns true if `source` looks like an HTTP(S) URL.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Download the body at `url`.
///
/// Any failure is reported as [`ScoutError::FetchFailed`].
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    if !is_url(url) {
        return Err(ScoutError::FetchFailed(format!(
            "URL must start with http:// or https://: {url}"
        )));
    }

    fetch(url).map_err(|e| {
        warn!(url, error = %e, "fetch failed");
        e
    })
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(DEFAULT_TIMEOUT))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let response = agent.get(url).call().map_err(|err| match err {
        ureq::Error::StatusCode(code) => {
            ScoutError::FetchFailed(format!("HTTP {code} from {url}"))
        }
        other => ScoutError::FetchFailed(other.to_string()),
    })?;

    let mut data = Vec::new();
    response
        .into_body()
        .into_reader()
        .read_to_end(&mut data)
        .map_err(|e| ScoutError::FetchFailed(e.to_string()))?;

    debug!(url, bytes = data.len(), "fetched source");
    Ok(data)
}
