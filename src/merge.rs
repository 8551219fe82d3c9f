//! Merge policy engine.
//!
//! Combines an existing curated record with a freshly generated one without
//! destroying manual edits. Invoked only for records the change detector
//! classified as changed; fresh inserts take the generated record as-is.
//!
//! Field rules, applied in order:
//! 1. always-overwrite: title, stage, action, updated_at
//! 2. key-merge: dates (a non-empty incoming value wins per key; nothing is
//!    ever erased)
//! 3. union: provenance sources (existing entries first, deduped by locator)
//! 4. protected manual fields: summary, target, actions, risk note
//! 5. tag union, then the one-way `needs_review` → `reviewed` transition

use std::collections::HashSet;

use crate::constants::{TAG_NEEDS_REVIEW, TAG_REVIEWED};
use crate::types::{CuratedRecord, SourceRef, Summary};

/// Merge a changed observation into the stored record.
///
/// Total over its inputs: no field combination fails, and fields the policy
/// does not name (id, law family, topic) keep their stored values.
#[must_use]
pub fn merge(existing: &CuratedRecord, auto: &CuratedRecord) -> CuratedRecord {
    let mut merged = existing.clone();
    let unreviewed = existing.tags.contains(TAG_NEEDS_REVIEW);

    // 1. Source-derived facts nobody hand-edits.
    merged.title = auto.title.clone();
    merged.stage = auto.stage;
    merged.action = auto.action.clone();
    merged.updated_at = auto.updated_at;

    // 2. Dates accumulate; an empty incoming value never erases a known one.
    for (kind, value) in &auto.dates {
        if !value.is_empty() {
            merged.dates.insert(kind.clone(), value.clone());
        }
    }

    // 3. Existing-first keeps manual relabeling of a source entry intact.
    merged.sources = union_sources(&existing.sources, &auto.sources);

    // 4. Manual fields flow in only while unreviewed or still empty.
    if unreviewed || existing.summary.as_ref().is_none_or(Summary::is_empty) {
        merged.summary = auto.summary.clone();
    }
    if unreviewed || existing.target.is_empty() {
        merged.target = auto.target.clone();
    }
    if unreviewed || existing.risk_note.as_deref().is_none_or(str::is_empty) {
        merged.risk_note = auto.risk_note.clone();
    }
    if unreviewed || existing.actions.is_empty() {
        merged.actions = auto.actions.clone();
    }

    // 5. Tag union, then the review transition. The generated side always
    // carries `needs_review`, so the union re-introduces it on every merge;
    // a merged summary that has left the template proves a human wrote it,
    // and the tag flips to `reviewed` exactly once.
    merged.tags = existing.tags.clone();
    merged.tags.union_with(&auto.tags);
    let still_template = merged.summary_is_template();
    if !still_template && merged.tags.contains(TAG_NEEDS_REVIEW) {
        merged.tags.remove(TAG_NEEDS_REVIEW);
        merged.tags.insert(TAG_REVIEWED);
    }
    merged.is_generated = still_template;

    merged
}

/// Existing-first union of provenance entries, keyed by locator.
///
/// Entries without a locator are dropped, mirroring the screening rule for
/// candidates; everything else is preserved in first-seen order.
#[must_use]
pub fn union_sources(existing: &[SourceRef], incoming: &[SourceRef]) -> Vec<SourceRef> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());
    for entry in existing.iter().chain(incoming) {
        if entry.locator.is_empty() {
            continue;
        }
        if seen.insert(entry.locator.as_str()) {
            merged.push(entry.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TAG_AUTO_GENERATED;
    use crate::identity::identify;
    use crate::types::{ProcessStage, RawCandidate};
    use chrono::NaiveDate;

    fn raw(title: &str, body: &str) -> RawCandidate {
        RawCandidate {
            locator: "https://example.go.jp/item/1".to_string(),
            title: title.to_string(),
            body: body.to_string(),
            source_label: "egov-pubcom".to_string(),
            published: None,
            stage: ProcessStage::PublicComment,
            dates: std::collections::BTreeMap::new(),
        }
    }

    fn generated(title: &str) -> CuratedRecord {
        let id = identify("https://example.go.jp/item/1");
        raw(title, "本文").into_generated(id, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    fn reviewed_record() -> CuratedRecord {
        let mut record = generated("旧タイトル");
        record.summary = Some(
            ["化学物質管理の強化", "対象は製造業", "2026年4月施行"]
                .into_iter()
                .collect(),
        );
        record.target = vec!["製造業".to_string()];
        record.risk_note = Some("罰則あり".to_string());
        record.actions = vec![crate::types::ActionItem::new("社内規程を改定", "総務")];
        record.tags.remove(TAG_NEEDS_REVIEW);
        record.tags.insert(TAG_REVIEWED);
        record.normalize();
        record
    }

    #[test]
    fn always_overwrite_fields_take_the_fresh_value() {
        let existing = reviewed_record();
        let mut auto = generated("新タイトル");
        auto.stage = ProcessStage::Promulgated;
        auto.updated_at = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();

        let merged = merge(&existing, &auto);
        assert_eq!(merged.title, "新タイトル");
        assert_eq!(merged.stage, ProcessStage::Promulgated);
        assert_eq!(merged.updated_at, auto.updated_at);
    }

    #[test]
    fn reviewed_manual_fields_are_preserved_verbatim() {
        let existing = reviewed_record();
        let merged = merge(&existing, &generated("新タイトル"));
        assert_eq!(merged.summary, existing.summary);
        assert_eq!(merged.target, existing.target);
        assert_eq!(merged.risk_note, existing.risk_note);
        assert_eq!(merged.actions, existing.actions);
        assert!(!merged.is_generated);
    }

    #[test]
    fn empty_manual_fields_are_filled_even_when_reviewed() {
        let mut existing = reviewed_record();
        existing.target = Vec::new();
        existing.risk_note = Some(String::new());

        let auto = generated("新タイトル");
        let merged = merge(&existing, &auto);
        assert_eq!(merged.target, auto.target);
        assert_eq!(merged.risk_note, auto.risk_note);
        // Non-empty fields stay untouched.
        assert_eq!(merged.summary, existing.summary);
    }

    #[test]
    fn unreviewed_records_accept_all_generated_fields() {
        let existing = generated("旧タイトル");
        let auto = generated("新タイトル");
        let merged = merge(&existing, &auto);
        assert_eq!(merged.summary, auto.summary);
        assert!(merged.summary_is_template());
        assert!(merged.tags.contains(TAG_NEEDS_REVIEW));
        assert!(merged.is_generated);
    }

    #[test]
    fn needs_review_reintroduced_by_union_is_flipped_to_reviewed() {
        let existing = reviewed_record();
        let merged = merge(&existing, &generated("新タイトル"));
        assert!(!merged.tags.contains(TAG_NEEDS_REVIEW));
        let reviewed_count = merged.tags.iter().filter(|t| *t == TAG_REVIEWED).count();
        assert_eq!(reviewed_count, 1);
    }

    #[test]
    fn dates_refine_forward_and_never_erase() {
        let mut existing = generated("旧");
        existing
            .dates
            .insert("promulgated".to_string(), "2025-05-01".to_string());

        let mut auto = generated("新");
        auto.dates
            .insert("enforced".to_string(), "2025-06-01".to_string());
        let merged = merge(&existing, &auto);
        assert_eq!(merged.dates.get("promulgated").map(String::as_str), Some("2025-05-01"));
        assert_eq!(merged.dates.get("enforced").map(String::as_str), Some("2025-06-01"));

        let mut empty_update = generated("新");
        empty_update
            .dates
            .insert("promulgated".to_string(), String::new());
        let merged_again = merge(&merged, &empty_update);
        assert_eq!(
            merged_again.dates.get("promulgated").map(String::as_str),
            Some("2025-05-01")
        );
    }

    #[test]
    fn source_union_never_shrinks_and_keeps_existing_first() {
        let mut existing = generated("旧");
        existing.sources = vec![
            SourceRef::new("手動ラベル", "https://example.go.jp/item/1"),
            SourceRef::new("mhlw", "https://www.mhlw.go.jp/page"),
        ];
        let mut auto = generated("新");
        auto.sources = vec![
            SourceRef::new("egov-pubcom", "https://example.go.jp/item/1"),
            SourceRef::new("jaish", "https://www.jaish.gr.jp/new"),
        ];

        let merged = merge(&existing, &auto);
        let locators: Vec<&str> = merged.sources.iter().map(|s| s.locator.as_str()).collect();
        assert_eq!(
            locators,
            [
                "https://example.go.jp/item/1",
                "https://www.mhlw.go.jp/page",
                "https://www.jaish.gr.jp/new"
            ]
        );
        // The manual relabel of the shared locator survives.
        assert_eq!(merged.sources[0].label, "手動ラベル");
    }

    #[test]
    fn unnamed_fields_keep_their_stored_values() {
        let mut existing = reviewed_record();
        existing.law_family = "作業環境測定関連法令".to_string();
        existing.topic = Some("化学物質".to_string());
        let merged = merge(&existing, &generated("新タイトル"));
        assert_eq!(merged.id, existing.id);
        assert_eq!(merged.law_family, existing.law_family);
        assert_eq!(merged.topic, existing.topic);
        assert!(merged.tags.contains(TAG_AUTO_GENERATED));
    }

    #[test]
    fn union_sources_drops_empty_locators() {
        let merged = union_sources(
            &[SourceRef::new("a", ""), SourceRef::new("b", "https://x")],
            &[SourceRef::new("c", "https://x")],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label, "b");
    }
}
