//! The persisted curated record and its field types.
//!
//! Field names on the wire stay compatible with the historical dataset
//! (`summary_3`, `risk_if_delayed`, `process`), and every field other than
//! the identifier deserializes with a default so differently-aged records
//! load without failing.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::tags::TagSet;
use crate::constants::TEMPLATE_SUMMARY;

/// Stable identifier of a curated record, derived from the normalized
/// source locator. See [`crate::identity::identify`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new<S: Into<String>>(hex: S) -> Self {
        Self(hex.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex hash of the last raw content observed for a record identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    #[must_use]
    pub fn new<S: Into<String>>(hex: S) -> Self {
        Self(hex.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle stage of a tracked revision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStage {
    #[default]
    PublicComment,
    Promulgated,
    EnforcementScheduled,
    Enforced,
    /// Stages introduced by newer fetchers deserialize without failing.
    #[serde(other)]
    Unknown,
}

impl ProcessStage {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PublicComment => "public_comment",
            Self::Promulgated => "promulgated",
            Self::EnforcementScheduled => "enforcement_scheduled",
            Self::Enforced => "enforced",
            Self::Unknown => "unknown",
        }
    }
}

/// One provenance entry: where an observation of this record came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub label: String,
    #[serde(rename = "url")]
    pub locator: String,
}

impl SourceRef {
    #[must_use]
    pub fn new<L: Into<String>, U: Into<String>>(label: L, locator: U) -> Self {
        Self {
            label: label.into(),
            locator: locator.into(),
        }
    }
}

/// A concrete follow-up task attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub text: String,
    #[serde(default)]
    pub owner: String,
}

impl ActionItem {
    #[must_use]
    pub fn new<T: Into<String>, O: Into<String>>(text: T, owner: O) -> Self {
        Self {
            text: text.into(),
            owner: owner.into(),
        }
    }
}

/// The structured three-line summary of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Summary(Vec<String>);

impl Summary {
    /// The fixed machine-generated placeholder.
    #[must_use]
    pub fn template() -> Self {
        Self(TEMPLATE_SUMMARY.iter().map(|line| (*line).to_string()).collect())
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.0
    }

    /// True while the lines still equal the machine-generated template.
    ///
    /// The literal comparison is the review sentinel for datasets written
    /// before the explicit `is_generated` flag existed; it must keep working
    /// on records that only a human's text editor has touched.
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.0.len() == TEMPLATE_SUMMARY.len()
            && self.0.iter().zip(TEMPLATE_SUMMARY).all(|(line, tpl)| line == tpl)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Summary {
    fn from(lines: Vec<String>) -> Self {
        Self(lines)
    }
}

impl<S: Into<String>> FromIterator<S> for Summary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The persisted unit of truth for one tracked law-revision item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedRecord {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub law_family: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(rename = "process", default)]
    pub stage: ProcessStage,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(rename = "summary_3", default)]
    pub summary: Option<Summary>,
    #[serde(default)]
    pub target: Vec<String>,
    /// Known milestone dates, keyed by kind ("promulgated", "enforced", ...).
    #[serde(default)]
    pub dates: BTreeMap<String, String>,
    #[serde(rename = "risk_if_delayed", default)]
    pub risk_note: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionItem>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    #[serde(default)]
    pub tags: TagSet,
    #[serde(default)]
    pub updated_at: NaiveDate,
    /// Engine-maintained mirror of the template sentinel. Recomputed on load
    /// and after every merge; never hand-edited.
    #[serde(default)]
    pub is_generated: bool,
}

impl CuratedRecord {
    /// Whether the record's editable fields are still machine-generated.
    #[must_use]
    pub fn summary_is_template(&self) -> bool {
        self.summary.as_ref().is_some_and(Summary::is_template)
    }

    /// Re-derive engine-maintained state after deserialization.
    ///
    /// Hand edits go through a text editor, which updates the summary lines
    /// but not the flag, so the sentinel comparison is authoritative.
    pub fn normalize(&mut self) {
        self.is_generated = self.summary_is_template();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_summary_matches_sentinel() {
        assert!(Summary::template().is_template());
        let edited: Summary = ["改正の概要", "対象は全事業場", "2026年4月施行"]
            .into_iter()
            .collect();
        assert!(!edited.is_template());
        let truncated: Summary = [TEMPLATE_SUMMARY[0], TEMPLATE_SUMMARY[1]].into_iter().collect();
        assert!(!truncated.is_template());
    }

    #[test]
    fn historical_wire_format_loads() {
        let json = r#"{
            "id": "0f3a",
            "title": "労働安全衛生規則の一部改正",
            "law_family": "労働安全衛生関連法令",
            "process": "public_comment",
            "action": "PREPARE",
            "summary_3": ["自動取得された案件です", "詳細は一次ソースを確認してください", "手動でsummary_3を更新してください"],
            "target": ["要確認"],
            "dates": {"promulgated": "2025-05-14"},
            "risk_if_delayed": "要確認",
            "actions": [{"text": "一次ソースを確認", "owner": "安全"}],
            "sources": [{"label": "egov-pubcom", "url": "https://example.go.jp/a"}],
            "tags": ["needs_review", "auto_generated"],
            "updated_at": "2025-05-20"
        }"#;
        let mut record: CuratedRecord = serde_json::from_str(json).unwrap();
        record.normalize();
        assert_eq!(record.stage, ProcessStage::PublicComment);
        assert_eq!(record.sources[0].locator, "https://example.go.jp/a");
        assert!(record.summary_is_template());
        assert!(record.is_generated);
        assert_eq!(
            record.updated_at,
            NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
        );
    }

    #[test]
    fn unknown_stage_is_tolerated() {
        let record: CuratedRecord =
            serde_json::from_str(r#"{"id": "x", "process": "committee_review"}"#).unwrap();
        assert_eq!(record.stage, ProcessStage::Unknown);
        assert!(record.summary.is_none());
        assert!(record.tags.is_empty());
    }

    #[test]
    fn wire_names_round_trip() {
        let mut record: CuratedRecord = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        record.summary = Some(Summary::template());
        record.risk_note = Some("要確認".to_string());
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("summary_3").is_some());
        assert!(json.get("risk_if_delayed").is_some());
        assert!(json.get("process").is_some());
        assert!(json.get("summary").is_none());
    }
}
