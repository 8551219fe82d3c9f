//! e-Gov public-comment feed parsing.
//!
//! Parses the public-comment RSS listing and keeps only the items whose
//! title or description mentions an occupational-safety topic. Works over
//! both RSS 2.0 and RDF/RSS 1.0 item shapes (`pubDate` vs `dc:date`).

use std::collections::BTreeMap;
use std::sync::OnceLock;

use quick_xml::Reader as XmlReader;
use quick_xml::events::Event;
use regex::Regex;

use super::SourceFeed;
use crate::error::Result;
use crate::types::{ProcessStage, RawCandidate};

/// Public-comment listing feed for the labor-standards category.
pub const EGOV_PUBCOM_FEED: &str =
    "https://public-comment.e-gov.go.jp/rss/pcm_list_0000000046.xml";

const SOURCE_NAME: &str = "egov-pubcom";

/// Keywords marking an item as occupational-safety related.
fn safety_regex() -> Option<&'static Regex> {
    static RE: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    crate::static_regex(
        &RE,
        "労働安全衛生|安全衛生|労災|化学物質|石綿|高年齢|作業環境|特定化学物質|有機溶剤|\
         粉じん|鉛|酸素欠乏|電離放射線|ボイラー|クレーン|熱中症|墜落|感電|保護具|\
         リスクアセスメント",
    )
}

/// e-Gov public-comment RSS source.
#[derive(Debug, Clone)]
pub struct EgovPubComment {
    endpoint: String,
}

impl EgovPubComment {
    #[must_use]
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for EgovPubComment {
    fn default() -> Self {
        Self::new(EGOV_PUBCOM_FEED)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemField {
    None,
    Title,
    Link,
    Description,
    Published,
}

#[derive(Debug, Default)]
struct PendingItem {
    title: String,
    link: String,
    description: String,
    published: String,
}

impl PendingItem {
    fn field_mut(&mut self, field: ItemField) -> Option<&mut String> {
        match field {
            ItemField::Title => Some(&mut self.title),
            ItemField::Link => Some(&mut self.link),
            ItemField::Description => Some(&mut self.description),
            ItemField::Published => Some(&mut self.published),
            ItemField::None => None,
        }
    }

    fn into_candidate(self) -> RawCandidate {
        RawCandidate {
            locator: self.link,
            title: self.title,
            body: self.description,
            source_label: SOURCE_NAME.to_string(),
            published: if self.published.is_empty() {
                None
            } else {
                Some(self.published)
            },
            stage: ProcessStage::PublicComment,
            dates: BTreeMap::new(),
        }
    }
}

impl SourceFeed for EgovPubComment {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn stage(&self) -> ProcessStage {
        ProcessStage::PublicComment
    }

    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawCandidate>> {
        let mut reader = XmlReader::from_reader(bytes);
        reader.trim_text(true);

        let mut candidates = Vec::new();
        let mut pending: Option<PendingItem> = None;
        let mut field = ItemField::None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"item" => {
                    pending = Some(PendingItem::default());
                    field = ItemField::None;
                }
                Ok(Event::Start(ref e)) if pending.is_some() => {
                    field = match e.name().as_ref() {
                        b"title" => ItemField::Title,
                        b"link" => ItemField::Link,
                        b"description" => ItemField::Description,
                        b"pubDate" | b"dc:date" => ItemField::Published,
                        _ => ItemField::None,
                    };
                }
                Ok(Event::Text(ref t)) => {
                    if let Some(item) = pending.as_mut() {
                        if let Some(slot) = item.field_mut(field) {
                            if let Ok(text) = t.unescape() {
                                slot.push_str(&text);
                            }
                        }
                    }
                }
                Ok(Event::CData(ref t)) => {
                    if let Some(item) = pending.as_mut() {
                        if let Some(slot) = item.field_mut(field) {
                            slot.push_str(&String::from_utf8_lossy(t));
                        }
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"item" => {
                        if let Some(item) = pending.take() {
                            if is_safety_related(&item.title, &item.description) {
                                candidates.push(item.into_candidate());
                            }
                        }
                        field = ItemField::None;
                    }
                    _ => field = ItemField::None,
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => return Err(err.into()),
            }
            buf.clear();
        }

        Ok(candidates)
    }
}

fn is_safety_related(title: &str, description: &str) -> bool {
    safety_regex().is_some_and(|re| re.is_match(title) || re.is_match(description))
}
