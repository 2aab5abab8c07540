use serde::{Deserialize, Serialize};

use crate::filter::hasher::strip_line_breaks;

/// Inbound report body: `{"status": {...}, "account": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub status: ReportedStatus,
    pub account: ReportedAccount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportedStatus {
    pub uri: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub spoiler_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportedAccount {
    pub acct: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRef {
    pub acct: String,
}

/// Record kept in the pending set until the next flush. Field order is part
/// of the set identity, so it must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReport {
    pub account: AccountRef,
    pub content: String,
    pub uri: String,
    pub spoiler_text: Option<String>,
    #[serde(rename = "_plain_content")]
    pub plain_content: String,
    #[serde(rename = "_reporter")]
    pub reporter: String,
}

impl PendingReport {
    pub fn from_request(request: ReportRequest, reporter: &str) -> Self {
        let ReportRequest { status, account } = request;
        Self {
            account: AccountRef { acct: account.acct },
            plain_content: strip_line_breaks(&status.content),
            content: status.content,
            uri: status.uri,
            spoiler_text: status.spoiler_text,
            reporter: reporter.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportAck {
    pub result: &'static str,
}

impl ReportAck {
    pub fn ok() -> Self {
        Self { result: "ok" }
    }
}
