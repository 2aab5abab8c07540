//! Scripted `SpamApi` for tests.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::{ApiReply, ScoreEntry, SpamApi, TextEntry};
use crate::error::{Result, SpamFilterError};

pub(crate) enum Script {
    Reply(ApiReply),
    /// Score every submitted text with the given (bad, good) per text.
    ScoreBy(fn(&str) -> (f64, f64)),
    /// Fails with a genuine reqwest error, as a dead endpoint would.
    Unreachable,
}

pub(crate) struct FakeSpamApi {
    script: Script,
    report_fails: bool,
    classify_calls: AtomicU32,
    pub(crate) submitted: Mutex<Vec<Vec<TextEntry>>>,
    pub(crate) reported: Mutex<Vec<Vec<Value>>>,
}

impl FakeSpamApi {
    pub(crate) fn new(script: Script) -> Self {
        Self {
            script,
            report_fails: false,
            classify_calls: AtomicU32::new(0),
            submitted: Mutex::new(Vec::new()),
            reported: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(scores: Vec<ScoreEntry>) -> Self {
        Self::new(Script::Reply(ApiReply::Scored(scores)))
    }

    pub(crate) fn failing_reports(mut self) -> Self {
        self.report_fails = true;
        self
    }

    pub(crate) fn classify_calls(&self) -> u32 {
        self.classify_calls.load(Ordering::SeqCst)
    }
}

/// A real `reqwest::Error`; building a request for a malformed url fails
/// before anything is sent.
pub(crate) fn transport_error() -> reqwest::Error {
    match reqwest::Client::new().get("not a url").build() {
        Ok(_) => panic!("malformed url must not build"),
        Err(err) => err,
    }
}

pub(crate) fn score(uri: &str, bad: f64, good: f64) -> ScoreEntry {
    ScoreEntry {
        uri: uri.to_string(),
        bad,
        good,
    }
}

#[async_trait]
impl SpamApi for FakeSpamApi {
    async fn classify_texts(&self, texts: &[TextEntry]) -> Result<ApiReply> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().push(texts.to_vec());
        match &self.script {
            Script::Reply(reply) => Ok(reply.clone()),
            Script::ScoreBy(f) => Ok(ApiReply::Scored(
                texts
                    .iter()
                    .map(|t| {
                        let (bad, good) = f(&t.content);
                        score(&t.uri, bad, good)
                    })
                    .collect(),
            )),
            Script::Unreachable => Err(SpamFilterError::Transport(transport_error())),
        }
    }

    async fn report_spams(&self, spams: &[Value]) -> Result<()> {
        self.reported.lock().push(spams.to_vec());
        if self.report_fails {
            return Err(SpamFilterError::RemoteStatus {
                status: 502,
                body: "bad gateway".into(),
            });
        }
        Ok(())
    }
}
