//! The session's declared emotion labels.
//!
//! The label set is session configuration, not a hardcoded constant: the
//! observed inference services report between five and seven labels. The
//! declaration order is canonical and drives every deterministic
//! tie-break, so two runs over identical samples always agree.

use serde::{Deserialize, Serialize};

/// Declared emotion labels in canonical (configuration) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Build a label set from the configured declaration order.
    ///
    /// Duplicates keep their first position.
    pub fn new<L: Into<String>, I: IntoIterator<Item = L>>(labels: I) -> Self {
        let mut seen = Vec::new();
        for label in labels {
            let label = label.into();
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        Self { labels: seen }
    }

    /// The canonical label order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of declared labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no labels are declared.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The primary label: first in canonical order, used for insight
    /// volatility and trend analysis.
    pub fn primary(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// Canonical position of a label, if declared.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|candidate| candidate == label)
    }

    /// Total ordering key for tie-breaking: declared labels rank by
    /// canonical position, undeclared labels rank after all declared ones
    /// in lexicographic order.
    pub fn rank(&self, label: &str) -> (usize, Option<String>) {
        match self.index_of(label) {
            Some(index) => (index, None),
            None => (self.labels.len(), Some(label.to_string())),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_set() -> LabelSet {
        LabelSet::new(["joy", "surprise", "anger", "sadness", "neutral"])
    }

    #[test]
    fn test_canonical_order_preserved() {
        let set = default_set();
        assert_eq!(set.index_of("joy"), Some(0));
        assert_eq!(set.index_of("neutral"), Some(4));
        assert_eq!(set.primary(), Some("joy"));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let set = LabelSet::new(["joy", "anger", "joy"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.index_of("anger"), Some(1));
    }

    #[test]
    fn test_undeclared_labels_rank_after_declared() {
        let set = default_set();
        assert!(set.rank("neutral") < set.rank("boredom"));
        assert!(set.rank("boredom") < set.rank("contempt"));
    }
}
