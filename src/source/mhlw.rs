//! Ministry revision-page extraction.
//!
//! The ministry pages are server-rendered HTML with no feed, so extraction
//! is regex-driven: the page heading, revision headings carrying
//! 改正/省令/政令 markers, and linked PDF documents. Each PDF link becomes
//! its own candidate (the document URL gives per-document identity); the
//! page itself is emitted once with the revision headings as its body.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::{SourceFeed, dates};
use crate::error::Result;
use crate::types::{ProcessStage, RawCandidate};

/// Occupational-safety revision index page.
pub const MHLW_REVISION_PAGE: &str = "https://www.mhlw.go.jp/stf/seisakunitsuite/bunya/koyou_roudou/roudoukijun/anzen/an-eihou/index_00001.html";

const SOURCE_NAME: &str = "mhlw";

fn heading_regex() -> Option<&'static Regex> {
    static RE: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    crate::static_regex(&RE, r"(?is)<h([123])[^>]*>(.*?)</h[123]>")
}

fn pdf_link_regex() -> Option<&'static Regex> {
    static RE: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    crate::static_regex(&RE, r#"(?is)<a\s[^>]*href="([^"]+\.pdf[^"]*)"[^>]*>(.*?)</a>"#)
}

fn tag_regex() -> Option<&'static Regex> {
    static RE: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    crate::static_regex(&RE, r"(?s)<[^>]*>")
}

/// Ministry page source.
#[derive(Debug, Clone)]
pub struct MhlwRevisionPage {
    page_url: String,
    origin: String,
}

impl MhlwRevisionPage {
    /// Source over one ministry page. The origin for relative links is
    /// derived from the page URL.
    #[must_use]
    pub fn new<S: Into<String>>(page_url: S) -> Self {
        let page_url = page_url.into();
        let origin = origin_of(&page_url);
        Self { page_url, origin }
    }
}

impl Default for MhlwRevisionPage {
    fn default() -> Self {
        Self::new(MHLW_REVISION_PAGE)
    }
}

impl SourceFeed for MhlwRevisionPage {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn endpoint(&self) -> &str {
        &self.page_url
    }

    fn stage(&self) -> ProcessStage {
        ProcessStage::Promulgated
    }

    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawCandidate>> {
        let html = String::from_utf8_lossy(bytes);
        let mut candidates = Vec::new();

        let mut page_title = String::new();
        let mut revision_lines = Vec::new();
        if let Some(re) = heading_regex() {
            for caps in re.captures_iter(&html) {
                let level = caps.get(1).map_or("", |m| m.as_str());
                let text = strip_tags(caps.get(2).map_or("", |m| m.as_str()));
                if text.is_empty() {
                    continue;
                }
                if level == "1" {
                    if page_title.is_empty() {
                        page_title = text;
                    }
                } else if is_revision_heading(&text) {
                    revision_lines.push(text);
                }
            }
        }

        // One candidate for the page itself, carrying the revision headings.
        if !revision_lines.is_empty() || !page_title.is_empty() {
            let body = revision_lines.join("\n");
            let mut record_dates = BTreeMap::new();
            if let Some(date) = dates::extract_date(&body) {
                record_dates.insert("promulgated".to_string(), date);
            }
            candidates.push(RawCandidate {
                locator: self.page_url.clone(),
                title: page_title.clone(),
                body,
                source_label: SOURCE_NAME.to_string(),
                published: None,
                stage: self.stage(),
                dates: record_dates,
            });
        }

        // One candidate per linked PDF document.
        if let Some(re) = pdf_link_regex() {
            for caps in re.captures_iter(&html) {
                let href = caps.get(1).map_or("", |m| m.as_str());
                let name = strip_tags(caps.get(2).map_or("", |m| m.as_str()));
                let locator = absolutize(&self.origin, href);
                let title = if name.is_empty() {
                    page_title.clone()
                } else {
                    name
                };
                candidates.push(RawCandidate {
                    locator,
                    title,
                    body: page_title.clone(),
                    source_label: SOURCE_NAME.to_string(),
                    published: None,
                    stage: self.stage(),
                    dates: BTreeMap::new(),
                });
            }
        }

        Ok(candidates)
    }
}

fn is_revision_heading(text: &str) -> bool {
    text.contains("改正") || text.contains("省令") || text.contains("政令")
}

/// Drop markup and collapse whitespace down to single spaces.
fn strip_tags(fragment: &str) -> String {
    let flat = match tag_regex() {
        Some(re) => re.replace_all(fragment, " "),
        None => fragment.into(),
    };
    flat.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn origin_of(url: &str) -> String {
    if let Some(scheme_end) = url.find("://") {
        let rest = &url[scheme_end + 3..];
        if let Some(path_start) = rest.find('/') {
            return url[..scheme_end + 3 + path_start].to_string();
        }
    }
    url.to_string()
}

fn absolutize(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}
