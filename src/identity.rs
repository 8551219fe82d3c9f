//! Stable identifier derivation for curated records.
//!
//! Identifiers must survive across runs and across fetchers that present the
//! same logical record with different locator casing or a stray trailing
//! slash. Normalization is conservative: the query string is preserved so two
//! genuinely distinct resources never collapse into one identifier.

use crate::types::RecordId;

/// Normalize a source locator prior to hashing.
///
/// Trims surrounding whitespace, lowercases, and strips at most one trailing
/// path separator. Total: any input, including the empty string, normalizes.
#[must_use]
pub fn normalize_locator(locator: &str) -> String {
    let trimmed = locator.trim().to_lowercase();
    match trimmed.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => trimmed,
    }
}

/// Derive the stable identifier for a locator.
///
/// Pure function of the normalized locator: equal normalized locators always
/// produce equal identifiers, across processes and runs.
#[must_use]
pub fn identify(locator: &str) -> RecordId {
    let normalized = normalize_locator(locator);
    RecordId::new(blake3::hash(normalized.as_bytes()).to_hex().to_string())
}
