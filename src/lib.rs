#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal/self-documenting functions don't need
// extensive docs. Public APIs should still have proper documentation.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Builder-style and accessor-heavy modules trip these without gaining clarity.
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::items_after_statements)]
//
// Some functions return Result for API consistency even when they currently
// can't fail, so error conditions can be added without breaking callers.
#![allow(clippy::unnecessary_wraps)]

//! Core library for Kaisei, a tracker for Japanese occupational-safety law
//! revisions.
//!
//! The crate owns the record-reconciliation engine: candidate observations
//! scraped from government sources are identified, change-detected against a
//! hash cache, and merged into a persisted curated dataset without
//! destroying human edits, duplicating entries, or churning on unchanged
//! inputs. Per-source feed parsing ships alongside as pure byte-level
//! parsers; HTTP serving and scheduling live outside this crate and consume
//! the persisted collection read-only.

use std::sync::OnceLock;

use regex::Regex;

/// The kaisei-core crate version (matches `Cargo.toml`).
pub const KAISEI_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod constants;
pub mod detect;
pub mod error;
pub mod identity;
pub mod merge;
pub mod source;
pub mod tracker;
pub mod types;

pub use constants::*;
pub use detect::{Classification, HashCache, classify};
pub use error::{KaiseiError, Result};
pub use identity::{identify, normalize_locator};
pub use merge::{merge, union_sources};
#[cfg(feature = "fetch")]
pub use source::{collect_candidates, fetch_bytes};
pub use source::{
    EGOV_PUBCOM_FEED, EgovPubComment, MhlwRevisionPage, SourceFeed, SourceRegistry,
};
pub use tracker::{BatchStats, Tracker};
pub use types::{
    ActionItem, ContentHash, CuratedRecord, ProcessStage, RawCandidate, RecordId, SourceRef,
    Summary, TagSet,
};

/// Compile-once regex lookup that degrades instead of panicking: a pattern
/// that fails to compile is reported once and the caller receives `None`.
pub(crate) fn static_regex(
    cell: &'static OnceLock<std::result::Result<Regex, String>>,
    pattern: &str,
) -> Option<&'static Regex> {
    let compiled = cell.get_or_init(|| Regex::new(pattern).map_err(|err| err.to_string()));
    match compiled {
        Ok(re) => Some(re),
        Err(msg) => {
            tracing::error!(pattern, error = %msg, "regex init failed");
            None
        }
    }
}
