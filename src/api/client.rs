use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;

use crate::{
    config::SpamApiConfig,
    error::{Result, SpamFilterError},
};

use super::{
    wire::{build_classify_form, build_report_body, parse_scores, ApiReply, TextEntry},
    SpamApi,
};

const REPORT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Clone)]
pub struct SpamApiClient {
    http: Client,
    config: SpamApiConfig,
}

impl SpamApiClient {
    pub fn new(http: Client, config: SpamApiConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl SpamApi for SpamApiClient {
    async fn classify_texts(&self, texts: &[TextEntry]) -> Result<ApiReply> {
        let form = build_classify_form(texts)?;
        let response = self
            .http
            .post(self.config.endpoint.clone())
            .timeout(self.config.timeout)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!(
                target: "classifier",
                status = status.as_u16(),
                body = %body,
                "spam api rejected classification request"
            );
            return Ok(ApiReply::Rejected {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
                body,
            });
        }

        tracing::debug!(target: "classifier", body = %body, "spam api response");
        Ok(ApiReply::Scored(parse_scores(&body)?))
    }

    async fn report_spams(&self, spams: &[Value]) -> Result<()> {
        let body = build_report_body(spams)?;
        let response = self
            .http
            .post(self.config.endpoint.clone())
            .timeout(self.config.timeout)
            .header(CONTENT_TYPE, REPORT_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpamFilterError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };
    use url::{form_urlencoded, Url};

    use super::*;
    use crate::api::ScoreEntry;

    struct CapturedRequest {
        head: String,
        body: String,
    }

    impl CapturedRequest {
        fn header(&self, name: &str) -> Option<&str> {
            header_value(&self.head, name)
        }

        fn json_field(&self) -> Value {
            let (_, json) = form_urlencoded::parse(self.body.as_bytes())
                .into_owned()
                .find(|(key, _)| key == "json")
                .expect("body carries a json form field");
            serde_json::from_str(&json).unwrap()
        }
    }

    fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
        head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    /// Serves exactly one request with the given status line and body, and
    /// hands back what the client sent.
    async fn serve_once(
        status_line: &'static str,
        reply: &'static str,
    ) -> (Url, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/ai/spam/", listener.local_addr().unwrap())).unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 4096];

            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before the request head");
                raw.extend_from_slice(&chunk[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&raw[..head_end]).into_owned();
            let length: usize = header_value(&head, "content-length")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            while raw.len() < head_end + length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
            }
            let body = String::from_utf8_lossy(&raw[head_end..]).into_owned();

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                reply.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            CapturedRequest { head, body }
        });

        (url, handle)
    }

    fn client_for(endpoint: Url, timeout: Duration) -> SpamApiClient {
        SpamApiClient::new(Client::new(), SpamApiConfig { endpoint, timeout })
    }

    #[tokio::test]
    async fn classify_posts_texts_in_json_form_field() {
        let (url, server) = serve_once("200 OK", r#"[{"uri":"a","bad":0.9,"good":0.1}]"#).await;
        let client = client_for(url, Duration::from_secs(5));

        let reply = client
            .classify_texts(&[TextEntry {
                uri: "a".into(),
                content: "buy now".into(),
            }])
            .await
            .unwrap();

        assert_eq!(
            reply,
            ApiReply::Scored(vec![ScoreEntry {
                uri: "a".into(),
                bad: 0.9,
                good: 0.1,
            }])
        );
        let request = server.await.unwrap();
        assert!(request.head.starts_with("POST /ai/spam/ "));
        assert!(request
            .header("content-type")
            .unwrap()
            .starts_with("application/x-www-form-urlencoded"));
        let payload = request.json_field();
        assert_eq!(payload["texts"][0]["uri"], "a");
        assert_eq!(payload["texts"][0]["content"], "buy now");
        assert_eq!(payload["spams"], "");
    }

    #[tokio::test]
    async fn non_success_status_is_a_rejected_reply() {
        let (url, server) = serve_once("500 Internal Server Error", "boom").await;
        let client = client_for(url, Duration::from_secs(5));

        let reply = client
            .classify_texts(&[TextEntry {
                uri: "a".into(),
                content: "x".into(),
            }])
            .await
            .unwrap();

        assert_eq!(
            reply,
            ApiReply::Rejected {
                status: 500,
                reason: "Internal Server Error".into(),
                body: "boom".into(),
            }
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn report_sends_json_content_type_with_form_body() {
        let (url, server) = serve_once("200 OK", "").await;
        let client = client_for(url, Duration::from_secs(5));

        client
            .report_spams(&[json!({"uri": "https://ex/1"})])
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert_eq!(
            request.header("content-type"),
            Some("application/json; charset=utf-8")
        );
        let payload = request.json_field();
        assert_eq!(payload["spams"][0]["uri"], "https://ex/1");
        assert_eq!(payload["texts"], "");
    }

    #[tokio::test]
    async fn report_rejection_is_a_remote_status_error() {
        let (url, server) = serve_once("502 Bad Gateway", "down").await;
        let client = client_for(url, Duration::from_secs(5));

        let err = client.report_spams(&[json!({})]).await.unwrap_err();

        assert!(matches!(
            err,
            SpamFilterError::RemoteStatus { status: 502, ref body } if body == "down"
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn slow_endpoint_hits_the_request_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });
        let client = client_for(url, Duration::from_millis(200));

        let err = client
            .classify_texts(&[TextEntry {
                uri: "a".into(),
                content: "x".into(),
            }])
            .await
            .unwrap_err();

        match err {
            SpamFilterError::Transport(err) => assert!(err.is_timeout()),
            other => panic!("expected a transport error, got {other:?}"),
        }
    }
}
