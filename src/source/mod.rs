//! Source feed traits and registry for multi-source candidate ingestion.
//!
//! Sources are pure parsers over fetched bytes: given one payload they emit
//! raw candidates for the reconciliation batch. Fetching is the caller's
//! concern, either external or via the `fetch` feature.

pub mod dates;
mod egov;
#[cfg(feature = "fetch")]
mod fetch;
mod mhlw;

pub use egov::{EGOV_PUBCOM_FEED, EgovPubComment};
#[cfg(feature = "fetch")]
pub use fetch::{collect_candidates, fetch_bytes};
pub use mhlw::MhlwRevisionPage;

use crate::error::Result;
use crate::types::{ProcessStage, RawCandidate};

/// Trait implemented by feed parsers that turn fetched bytes into candidates.
pub trait SourceFeed: Send + Sync {
    /// Label recorded as provenance on candidates from this source.
    fn name(&self) -> &'static str;

    /// Endpoint this source reads, for the fetching caller.
    fn endpoint(&self) -> &str;

    /// Stage implied for fresh records observed by this source.
    fn stage(&self) -> ProcessStage;

    /// Parse one fetched payload into raw candidates. Pure over `bytes`.
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawCandidate>>;
}

/// Registry of source feeds, consulted in registration order.
pub struct SourceRegistry {
    sources: Vec<Box<dyn SourceFeed>>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S>(&mut self, source: S)
    where
        S: SourceFeed + 'static,
    {
        self.sources.push(Box::new(source));
    }

    #[must_use]
    pub fn sources(&self) -> &[Box<dyn SourceFeed>] {
        &self.sources
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(EgovPubComment::default());
        registry.register(MhlwRevisionPage::default());
        registry
    }
}
