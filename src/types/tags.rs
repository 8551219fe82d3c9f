//! Insertion-ordered tag set.

use serde::{Deserialize, Deserializer, Serialize};

/// Ordered set of tags attached to a curated record.
///
/// Keeps first-seen order and rejects duplicates, so unions are deterministic
/// instead of depending on the iteration order of a general-purpose map.
/// Serializes as a plain JSON array to stay wire-compatible with the
/// historical dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a tag, keeping first-seen order. Returns false on duplicates.
    pub fn insert<S: Into<String>>(&mut self, tag: S) -> bool {
        let tag = tag.into();
        if self.0.iter().any(|t| *t == tag) {
            false
        } else {
            self.0.push(tag);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Remove a tag. Returns true if it was present.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != before
    }

    /// Existing-first union: `other`'s novel tags are appended in their order.
    pub fn union_with(&mut self, other: &TagSet) {
        for tag in &other.0 {
            self.insert(tag.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

// Hand-edited datasets occasionally contain duplicate tags; fold them away
// on load instead of failing or carrying them forward.
impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tags = Vec::<String>::deserialize(deserializer)?;
        Ok(tags.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_seen_order() {
        let mut tags = TagSet::new();
        assert!(tags.insert("b"));
        assert!(tags.insert("a"));
        assert!(!tags.insert("b"));
        assert_eq!(tags.as_slice(), ["b", "a"]);
    }

    #[test]
    fn union_appends_novel_tags_only() {
        let mut left: TagSet = ["x", "y"].into_iter().collect();
        let right: TagSet = ["y", "z"].into_iter().collect();
        left.union_with(&right);
        assert_eq!(left.as_slice(), ["x", "y", "z"]);
    }

    #[test]
    fn remove_reports_presence() {
        let mut tags: TagSet = ["x"].into_iter().collect();
        assert!(tags.remove("x"));
        assert!(!tags.remove("x"));
        assert!(tags.is_empty());
    }

    #[test]
    fn deserialize_folds_duplicates() {
        let tags: TagSet = serde_json::from_str(r#"["a","b","a"]"#).unwrap();
        assert_eq!(tags.as_slice(), ["a", "b"]);
    }
}
