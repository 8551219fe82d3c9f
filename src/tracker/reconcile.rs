//! Batch reconciliation: screen, identify, classify, then insert or merge.
//!
//! One call processes a finite batch of raw candidates to completion against
//! the in-memory state. Nothing is persisted here; the caller commits once at
//! the end of the run.

use chrono::{NaiveDate, Utc};

use super::Tracker;
use crate::detect::{Classification, HashCache, classify};
use crate::identity::identify;
use crate::merge::merge;
use crate::types::RawCandidate;

/// Counters for one reconciliation batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Candidates handed to the batch, before screening.
    pub fetched: usize,
    /// Fresh records inserted, tagged for review.
    pub inserted: usize,
    /// Existing records merged with changed content.
    pub merged: usize,
    /// Observations whose content matched the cache; no merge ran.
    pub unchanged: usize,
    /// Malformed candidates dropped before identity resolution.
    pub dropped: usize,
}

impl Tracker {
    /// Reconcile a batch of raw candidates, dated today.
    pub fn reconcile(&mut self, batch: Vec<RawCandidate>) -> BatchStats {
        self.reconcile_at(batch, Utc::now().date_naive())
    }

    /// Reconcile with an explicit observation date.
    ///
    /// In-memory only; call [`Tracker::commit`] to persist the result. The
    /// outgoing hash cache is rebuilt from this batch alone, so identities
    /// not observed here lose their cache entry and re-merge on their next
    /// appearance.
    pub fn reconcile_at(&mut self, batch: Vec<RawCandidate>, today: NaiveDate) -> BatchStats {
        let mut stats = BatchStats {
            fetched: batch.len(),
            ..BatchStats::default()
        };
        let mut next_cache = HashCache::new();

        for raw in batch {
            if !raw.is_well_formed() {
                tracing::warn!(locator = %raw.locator, title = %raw.title, "dropping malformed candidate");
                stats.dropped += 1;
                continue;
            }

            let id = identify(&raw.locator);
            let hash = raw.content_hash();
            // Unchanged observations still refresh the freshness marker for this run.
            next_cache.insert(id.clone(), hash.clone());

            match classify(&self.records, &self.cache, &id, &hash) {
                Classification::New => {
                    let record = raw.into_generated(id.clone(), today);
                    self.records.insert(id, record);
                    stats.inserted += 1;
                }
                Classification::Changed => {
                    let auto = raw.into_generated(id.clone(), today);
                    if let Some(existing) = self.records.get(&id) {
                        let updated = merge(existing, &auto);
                        self.records.insert(id, updated);
                    }
                    stats.merged += 1;
                }
                Classification::Unchanged => {
                    stats.unchanged += 1;
                }
            }
        }

        self.cache = next_cache;
        self.dirty = true;
        tracing::info!(
            fetched = stats.fetched,
            inserted = stats.inserted,
            merged = stats.merged,
            unchanged = stats.unchanged,
            dropped = stats.dropped,
            "batch reconciled"
        );
        stats
    }
}
