use std::fmt;

use serde::{Deserialize, Serialize};

use super::ContentItem;

const SPAM_THRESHOLD: f64 = 0.5;

/// Hex-encoded SHA-256 of a post's plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub(crate) fn from_hex(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scores for one distinct text, as cached and as attached to items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamVerdict {
    pub uri: String,
    pub bad_score: f64,
    pub good_score: f64,
    pub is_spam: bool,
}

impl SpamVerdict {
    pub fn from_scores(uri: impl Into<String>, bad_score: f64, good_score: f64) -> Self {
        Self {
            uri: uri.into(),
            bad_score,
            good_score,
            is_spam: is_spam(bad_score, good_score),
        }
    }
}

pub fn is_spam(bad_score: f64, good_score: f64) -> bool {
    bad_score > good_score && bad_score >= SPAM_THRESHOLD
}

/// Where an item's verdict came from in this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictSource {
    Cache,
    Remote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub verdict: SpamVerdict,
    pub source: VerdictSource,
}

/// One input item together with whatever verdict this pass produced for it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedItem<'a> {
    pub item: &'a ContentItem,
    pub annotation: Option<Annotation>,
}

impl AnnotatedItem<'_> {
    pub fn verdict(&self) -> Option<&SpamVerdict> {
        self.annotation.as_ref().map(|a| &a.verdict)
    }

    pub fn is_spam(&self) -> bool {
        self.verdict().map_or(false, |v| v.is_spam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spam_threshold_boundaries() {
        assert!(is_spam(0.5, 0.49));
        assert!(!is_spam(0.5, 0.5));
        assert!(!is_spam(0.49, 0.0));
        assert!(is_spam(0.9, 0.1));
        assert!(!is_spam(0.1, 0.9));
    }

    #[test]
    fn verdict_derives_flag_from_scores() {
        let verdict = SpamVerdict::from_scores("https://example/1", 0.7, 0.2);
        assert!(verdict.is_spam);
        let json = serde_json::to_string(&verdict).unwrap();
        assert!(json.contains("\"bad_score\":0.7"));
    }
}
