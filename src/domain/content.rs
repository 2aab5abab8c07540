use serde::{Deserialize, Serialize};

/// A post handed to the filter by the host for one moderation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub uri: String,
    pub acct: String,
    /// Raw (HTML) content as received from the instance.
    pub content: String,
    pub plain_content: String,
    #[serde(default)]
    pub spoiler_text: Option<String>,
}

impl ContentItem {
    pub fn new(uri: impl Into<String>, plain_content: impl Into<String>) -> Self {
        let plain_content = plain_content.into();
        Self {
            uri: uri.into(),
            acct: String::new(),
            content: plain_content.clone(),
            plain_content,
            spoiler_text: None,
        }
    }

    pub fn with_acct(mut self, acct: impl Into<String>) -> Self {
        self.acct = acct.into();
        self
    }
}
