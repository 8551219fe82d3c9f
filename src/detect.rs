//! Change detection for incoming candidates.
//!
//! Compares the content hash of a fresh observation against the hash cached
//! for its identity on the previous run. Side-effect free: the caller writes
//! the new hash into the outgoing cache for every screened candidate, so
//! unchanged inputs still refresh the cache without triggering a merge.

use std::collections::BTreeMap;

use crate::types::{ContentHash, CuratedRecord, RecordId};

/// Map from record identifier to the hash of the last observed raw content.
///
/// Auxiliary state only: rewritten wholesale each batch run and never
/// surfaced to consumers of the curated collection.
pub type HashCache = BTreeMap<RecordId, ContentHash>;

/// Outcome of comparing a candidate against prior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No curated record exists for this identity.
    New,
    /// A curated record exists and the observed content matches the cache.
    Unchanged,
    /// A curated record exists but the observed content differs.
    Changed,
}

/// Classify one observation.
///
/// Absence of a curated record forces [`Classification::New`] regardless of
/// any stale cache entry; a curated record with no cache entry counts as
/// changed, since nothing proves the stored state reflects this content.
#[must_use]
pub fn classify(
    records: &BTreeMap<RecordId, CuratedRecord>,
    cache: &HashCache,
    id: &RecordId,
    hash: &ContentHash,
) -> Classification {
    if !records.contains_key(id) {
        return Classification::New;
    }
    match cache.get(id) {
        Some(prev) if prev == hash => Classification::Unchanged,
        _ => Classification::Changed,
    }
}
