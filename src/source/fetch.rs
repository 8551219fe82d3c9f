//! Live feed retrieval over HTTP. Compiled only with the `fetch` feature so
//! default builds stay network-free.

use std::time::Duration;

use super::SourceRegistry;
use crate::constants::{CRAWLER_USER_AGENT, FETCH_TIMEOUT_SECS};
use crate::error::{KaiseiError, Result};
use crate::types::RawCandidate;

/// Pause between requests so the government hosts see a polite crawl rate.
const FETCH_SPACING: Duration = Duration::from_secs(1);

/// Fetch one source payload with the crawler User-Agent and a timeout.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let wrap = |source: reqwest::Error| KaiseiError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(CRAWLER_USER_AGENT)
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(wrap)?;
    let response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(wrap)?;
    let body = response.bytes().map_err(wrap)?;
    Ok(body.to_vec())
}

/// Fetch and parse every registered source into one candidate batch.
///
/// A source that fails to fetch or parse is logged and skipped; one
/// unreachable endpoint must not abort the whole run.
#[must_use]
pub fn collect_candidates(registry: &SourceRegistry) -> Vec<RawCandidate> {
    let mut batch = Vec::new();
    for (index, source) in registry.sources().iter().enumerate() {
        if index > 0 {
            std::thread::sleep(FETCH_SPACING);
        }
        match fetch_bytes(source.endpoint()).and_then(|bytes| source.parse(&bytes)) {
            Ok(candidates) => {
                tracing::info!(
                    source = source.name(),
                    count = candidates.len(),
                    "source fetched"
                );
                batch.extend(candidates);
            }
            Err(err) => {
                tracing::warn!(source = source.name(), %err, "source skipped");
            }
        }
    }
    batch
}
