//! Interpretation of raw API responses.
//!
//! The OpenDota API reports failures inside an HTTP 200 body as
//! `{"error": "..."}`, and a disabled node answers with an HTML page.
//! [`classify`] maps every raw response onto either a payload or an
//! [`ErrorKind`]; it is a pure function of its input.

use crate::{ErrorKind, Payload, Result};

/// Error message of a missing resource
const NOT_FOUND: &str = "Not Found";

/// Error message of a node in maintenance mode
const NODE_DISABLED: &str = "Node disabled";

/// What the transport got back for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawResponse {
    /// The response body, not yet decoded
    Body(String),
    /// The node answered with an HTML (maintenance or login) page
    NodeDisabled,
    /// No body was received at all
    Failed(String),
}

impl RawResponse {
    /// Wrap a response body, recognizing HTML pages before any JSON decoding
    pub fn from_body(body: String) -> Self {
        if is_html_document(&body) {
            RawResponse::NodeDisabled
        } else {
            RawResponse::Body(body)
        }
    }
}

/// Whether `body` is an HTML document rather than an API response.
///
/// JSON documents are never HTML, even when a string inside them holds
/// markup. Anything else counts as HTML if it contains a doctype or an
/// `<html>` tag anywhere, so comments or an XML prolog in front of the
/// page do not hide it.
pub fn is_html_document(body: &str) -> bool {
    let body = body.trim_start();
    if body.starts_with('{') || body.starts_with('[') {
        return false;
    }
    let body = body.to_ascii_lowercase();
    body.contains("<!doctype html") || body.contains("<html")
}

/// Classify a raw response into a payload or a failure
pub fn classify(raw: &RawResponse) -> Result<Payload> {
    let body = match raw {
        RawResponse::Body(body) => body,
        RawResponse::NodeDisabled => return Err(ErrorKind::NodeDisabled),
        RawResponse::Failed(reason) => return Err(ErrorKind::TransportFailure(reason.clone())),
    };

    let payload: Payload =
        serde_json::from_str(body).map_err(|e| ErrorKind::DecodeFailure(e.to_string()))?;

    if is_empty(&payload) {
        return Err(ErrorKind::EmptyResponse);
    }

    // `"error": null` is no error at all
    let error = payload
        .as_object()
        .and_then(|obj| obj.get("error"))
        .filter(|e| !e.is_null());
    if let Some(error) = error {
        let message = match error {
            Payload::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(match message.as_str() {
            NOT_FOUND => ErrorKind::NotFound,
            NODE_DISABLED => ErrorKind::NodeDisabled,
            _ => ErrorKind::RemoteError(message),
        });
    }

    Ok(payload)
}

/// `null`, `false`, `0`, `""`, `[]` and `{}` carry no data
fn is_empty(payload: &Payload) -> bool {
    match payload {
        Payload::Null => true,
        Payload::Bool(b) => !b,
        Payload::Number(n) => n.as_f64() == Some(0.0),
        Payload::String(s) => s.is_empty() || s == "0",
        Payload::Array(a) => a.is_empty(),
        Payload::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn body(s: &str) -> RawResponse {
        RawResponse::from_body(s.to_string())
    }

    #[test]
    fn test_success_keeps_structure_and_order() {
        let raw = body(r#"{"match_id": 42, "radiant_win": true, "players": [{"hero_id": 1}]}"#);
        let payload = classify(&raw).unwrap();
        assert_eq!(
            payload,
            json!({"match_id": 42, "radiant_win": true, "players": [{"hero_id": 1}]})
        );
        let keys: Vec<_> = payload.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["match_id", "radiant_win", "players"]);
    }

    #[test]
    fn test_arrays_are_payloads() {
        let payload = classify(&body(r#"[{"id": 1}, {"id": 2}]"#)).unwrap();
        assert_eq!(payload.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            classify(&body(r#"{"error":"Not Found"}"#)),
            Err(ErrorKind::NotFound)
        );
        assert_eq!(
            classify(&body(r#"{"error":"Node disabled"}"#)),
            Err(ErrorKind::NodeDisabled)
        );
        assert_eq!(
            classify(&body(r#"{"error":"rate limit exceeded"}"#)),
            Err(ErrorKind::RemoteError("rate limit exceeded".into()))
        );
        assert_eq!(
            classify(&body(r#"{"error":{"code":500}}"#)),
            Err(ErrorKind::RemoteError(r#"{"code":500}"#.into()))
        );
    }

    #[test]
    fn test_empty_and_garbage() {
        assert_eq!(classify(&body("{}")), Err(ErrorKind::EmptyResponse));
        assert_eq!(classify(&body("[]")), Err(ErrorKind::EmptyResponse));
        assert_eq!(classify(&body("null")), Err(ErrorKind::EmptyResponse));
        assert!(matches!(
            classify(&body("")),
            Err(ErrorKind::DecodeFailure(_))
        ));
        assert!(matches!(
            classify(&body("upstream timed out")),
            Err(ErrorKind::DecodeFailure(_))
        ));
    }

    #[test]
    fn test_html_page_is_node_disabled() {
        let page = "<!DOCTYPE HTML>\n<html><body>Maintenance</body></html>";
        assert_eq!(body(page), RawResponse::NodeDisabled);
        assert_eq!(classify(&body(page)), Err(ErrorKind::NodeDisabled));
        assert!(is_html_document("  <html lang=\"en\">"));
        assert!(!is_html_document(r#"{"html": "<html>"}"#));
    }

    #[test]
    fn test_html_page_behind_a_prefix() {
        let commented = "<!-- maintenance -->\n<!DOCTYPE HTML>\n<html><body>Back soon</body></html>";
        assert_eq!(body(commented), RawResponse::NodeDisabled);

        let prolog = "<?xml version=\"1.0\"?>\n<HTML><body>Login</body></HTML>";
        assert_eq!(body(prolog), RawResponse::NodeDisabled);

        assert!(!is_html_document("upstream timed out"));
    }

    #[test]
    fn test_null_error_is_success() {
        let payload = classify(&body(r#"{"error":null,"match_id":1}"#)).unwrap();
        assert_eq!(payload, json!({"error": null, "match_id": 1}));
    }

    #[test]
    fn test_transport_failure() {
        let raw = RawResponse::Failed("connection refused".into());
        assert_eq!(
            classify(&raw),
            Err(ErrorKind::TransportFailure("connection refused".into()))
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        for raw in &[
            body(r#"{"error":"busy"}"#),
            body(r#"{"a":1}"#),
            body("<!doctype html>"),
            body("nope"),
        ] {
            assert_eq!(classify(raw), classify(raw));
        }
    }
}
