use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::error::Result;

/// One distinct text submitted for scoring, tagged with the uri that the
/// service must echo back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextEntry {
    pub uri: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyPayload<'a> {
    pub texts: &'a [TextEntry],
    pub spams: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReportPayload<'a> {
    pub spams: &'a [Value],
    pub texts: &'static str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreEntry {
    pub uri: String,
    #[serde(alias = "bad_score")]
    pub bad: f64,
    #[serde(alias = "good_score")]
    pub good: f64,
}

/// What the classification endpoint said, short of a transport failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    Scored(Vec<ScoreEntry>),
    Rejected {
        status: u16,
        reason: String,
        body: String,
    },
}

/// The endpoint reads a form field `json` holding the whole payload.
pub fn build_classify_form(texts: &[TextEntry]) -> Result<Vec<(&'static str, String)>> {
    let payload = ClassifyPayload { texts, spams: "" };
    Ok(vec![("json", serde_json::to_string(&payload)?)])
}

/// Same `json` form field as classification, although the call is sent with a
/// JSON content type.
pub fn build_report_body(spams: &[Value]) -> Result<String> {
    let payload = ReportPayload { spams, texts: "" };
    let json = serde_json::to_string(&payload)?;
    Ok(form_urlencoded::Serializer::new(String::new())
        .append_pair("json", &json)
        .finish())
}

pub fn parse_scores(body: &str) -> Result<Vec<ScoreEntry>> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_form_wraps_payload_in_json_field() {
        let texts = vec![TextEntry {
            uri: "https://a/1".into(),
            content: "buy now".into(),
        }];
        let form = build_classify_form(&texts).unwrap();
        assert_eq!(form.len(), 1);
        assert_eq!(form[0].0, "json");
        let value: Value = serde_json::from_str(&form[0].1).unwrap();
        assert_eq!(value["spams"], "");
        assert_eq!(value["texts"][0]["uri"], "https://a/1");
        assert_eq!(value["texts"][0]["content"], "buy now");
    }

    #[test]
    fn parses_both_score_field_spellings() {
        let scores =
            parse_scores(r#"[{"uri":"a","bad":0.9,"good":0.1},{"uri":"b","bad_score":0.2,"good_score":0.8}]"#)
                .unwrap();
        assert_eq!(scores[0].bad, 0.9);
        assert_eq!(scores[1].good, 0.8);
    }

    #[test]
    fn rejects_non_array_body() {
        assert!(parse_scores(r#"{"error":"boom"}"#).is_err());
    }

    #[test]
    fn report_body_is_a_json_form_field() {
        let body = build_report_body(&[serde_json::json!({"uri": "x"})]).unwrap();
        assert!(body.starts_with("json="));

        let fields: Vec<(String, String)> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "json");
        assert_eq!(fields[0].1, r#"{"spams":[{"uri":"x"}],"texts":""}"#);
    }
}
