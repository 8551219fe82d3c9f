//! Shared constants: template text, tag names, and store layout.

/// The fixed three-line placeholder inserted for freshly generated records.
///
/// The literal wording doubles as the review sentinel: a record whose summary
/// still equals these lines has not been touched by a human. Existing datasets
/// depend on the exact strings, so they must not change.
pub const TEMPLATE_SUMMARY: [&str; 3] = [
    "自動取得された案件です",
    "詳細は一次ソースを確認してください",
    "手動でsummary_3を更新してください",
];

/// Tag carried by records whose editable fields are still machine-generated.
pub const TAG_NEEDS_REVIEW: &str = "needs_review";
/// Tag recorded once a human has certified the editable fields.
pub const TAG_REVIEWED: &str = "reviewed";
/// Tag marking records inserted by the engine rather than by hand.
pub const TAG_AUTO_GENERATED: &str = "auto_generated";

/// Law family recorded on generated records.
pub const DEFAULT_LAW_FAMILY: &str = "労働安全衛生関連法令";
/// Placeholder for fields awaiting human confirmation.
pub const PLACEHOLDER_PENDING: &str = "要確認";
/// Advisory recorded on generated records until triaged.
pub const DEFAULT_ADVISORY: &str = "PREPARE";
/// Owner assigned to the default follow-up actions.
pub const DEFAULT_ACTION_OWNER: &str = "安全";

/// Curated collection file, relative to the store root.
pub const ITEMS_FILE: &str = "items.json";
/// Hash-cache file, relative to the store root.
pub const CACHE_FILE: &str = "cache/last-fetch.json";

/// User-Agent presented when fetching source feeds.
pub const CRAWLER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
/// Per-request timeout for live feed fetches, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 10;
