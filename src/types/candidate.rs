//! Raw candidate observations produced by the source layer.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::record::{
    ActionItem, ContentHash, CuratedRecord, ProcessStage, RecordId, SourceRef, Summary,
};
use super::tags::TagSet;
use crate::constants::{
    DEFAULT_ACTION_OWNER, DEFAULT_ADVISORY, DEFAULT_LAW_FAMILY, PLACEHOLDER_PENDING,
    TAG_AUTO_GENERATED, TAG_NEEDS_REVIEW,
};

/// One unvalidated observation fetched from a source, before reconciliation.
///
/// Transient: lives only within a batch run and is consumed when a generated
/// record is built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Source locator (URL or equivalent); the identity input.
    pub locator: String,
    pub title: String,
    /// Free text: feed description or page excerpt, kept verbatim.
    #[serde(default)]
    pub body: String,
    /// Label of the producing source, recorded as provenance.
    pub source_label: String,
    /// Publication timestamp as reported by the source, verbatim.
    #[serde(default)]
    pub published: Option<String>,
    /// Stage the producing source implies for fresh records.
    #[serde(default)]
    pub stage: ProcessStage,
    /// Milestone dates the source recognized, keyed by kind. Derived from
    /// the body text, so they are not part of the content hash.
    #[serde(default)]
    pub dates: BTreeMap<String, String>,
}

impl RawCandidate {
    /// Screening gate applied before identity resolution: a candidate
    /// without a locator or title cannot be reconciled.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.locator.trim().is_empty() && !self.title.trim().is_empty()
    }

    /// Deterministic hash of the observed content.
    ///
    /// Covers the content fields only; the provenance label and stage hint
    /// are routing metadata, not observations.
    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        for field in [&self.locator, &self.title, &self.body] {
            hasher.update(field.as_bytes());
            hasher.update(&[0]);
        }
        if let Some(published) = &self.published {
            hasher.update(published.as_bytes());
        }
        hasher.update(&[0]);
        ContentHash::new(hasher.finalize().to_hex().to_string())
    }

    /// Build the fresh machine-generated record for this observation.
    ///
    /// Editable fields start as placeholders, the record is tagged
    /// `needs_review` + `auto_generated`, and any notice/deadline dates found
    /// in the body are recorded as tags.
    #[must_use]
    pub fn into_generated(self, id: RecordId, today: NaiveDate) -> CuratedRecord {
        let mut tags = TagSet::new();
        tags.insert(TAG_NEEDS_REVIEW);
        tags.insert(TAG_AUTO_GENERATED);
        for tag in date_tags(&self.body) {
            tags.insert(tag);
        }

        CuratedRecord {
            id,
            title: self.title,
            law_family: DEFAULT_LAW_FAMILY.to_string(),
            topic: Some(PLACEHOLDER_PENDING.to_string()),
            stage: self.stage,
            action: Some(DEFAULT_ADVISORY.to_string()),
            summary: Some(Summary::template()),
            target: vec![PLACEHOLDER_PENDING.to_string()],
            dates: self.dates,
            risk_note: Some(PLACEHOLDER_PENDING.to_string()),
            actions: vec![
                ActionItem::new("一次ソースを確認", DEFAULT_ACTION_OWNER),
                ActionItem::new("対応要否を判断", DEFAULT_ACTION_OWNER),
            ],
            sources: vec![SourceRef::new(self.source_label, self.locator)],
            tags,
            updated_at: today,
            is_generated: true,
        }
    }
}

/// Notice (公示) and deadline (締切) dates mentioned in feed text, as tags.
fn date_tags(body: &str) -> Vec<String> {
    let mut tags = Vec::new();

    static NOTICE: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    if let Some(re) = crate::static_regex(&NOTICE, r"公示日[：:]\s*(\d{4})/(\d{1,2})/(\d{1,2})") {
        if let Some(caps) = re.captures(body) {
            if let (Some(y), Some(m), Some(d)) = (caps.get(1), caps.get(2), caps.get(3)) {
                tags.push(format!(
                    "公示:{}-{}-{}",
                    y.as_str(),
                    pad2(m.as_str()),
                    pad2(d.as_str())
                ));
            }
        }
    }

    static DEADLINE: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    if let Some(re) =
        crate::static_regex(&DEADLINE, r"(締切|受付締切)[^0-9]*(\d{4})/(\d{1,2})/(\d{1,2})")
    {
        if let Some(caps) = re.captures(body) {
            if let (Some(y), Some(m), Some(d)) = (caps.get(2), caps.get(3), caps.get(4)) {
                tags.push(format!(
                    "締切:{}-{}-{}",
                    y.as_str(),
                    pad2(m.as_str()),
                    pad2(d.as_str())
                ));
            }
        }
    }

    tags
}

fn pad2(digits: &str) -> String {
    if digits.len() == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(locator: &str, title: &str, body: &str) -> RawCandidate {
        RawCandidate {
            locator: locator.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            source_label: "egov-pubcom".to_string(),
            published: None,
            stage: ProcessStage::PublicComment,
            dates: BTreeMap::new(),
        }
    }

    #[test]
    fn content_hash_is_stable_and_sensitive() {
        let a = candidate("https://example.go.jp/a", "title", "body");
        let b = candidate("https://example.go.jp/a", "title", "body");
        assert_eq!(a.content_hash(), b.content_hash());

        let changed = candidate("https://example.go.jp/a", "title", "body v2");
        assert_ne!(a.content_hash(), changed.content_hash());
    }

    #[test]
    fn field_boundaries_do_not_collide() {
        let a = candidate("https://example.go.jp/a", "ab", "c");
        let b = candidate("https://example.go.jp/a", "a", "bc");
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn screening_rejects_missing_locator_or_title() {
        assert!(!candidate("", "title", "").is_well_formed());
        assert!(!candidate("https://example.go.jp/a", "  ", "").is_well_formed());
        assert!(candidate("https://example.go.jp/a", "title", "").is_well_formed());
    }

    #[test]
    fn generated_record_carries_review_tags_and_template() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let record = candidate("https://example.go.jp/a", "改正案", "説明")
            .into_generated(RecordId::new("id-a"), today);
        assert!(record.tags.contains(TAG_NEEDS_REVIEW));
        assert!(record.tags.contains(TAG_AUTO_GENERATED));
        assert!(record.summary_is_template());
        assert!(record.is_generated);
        assert_eq!(record.updated_at, today);
        assert_eq!(record.sources.len(), 1);
        assert_eq!(record.sources[0].label, "egov-pubcom");
    }

    #[test]
    fn notice_and_deadline_dates_become_tags() {
        let body = "概要。公示日：2025/6/3。意見受付締切は 2025/7/1 まで。";
        let record = candidate("https://example.go.jp/a", "改正案", body)
            .into_generated(RecordId::new("id-a"), NaiveDate::default());
        assert!(record.tags.contains("公示:2025-06-03"));
        assert!(record.tags.contains("締切:2025-07-01"));
    }
}
