//! Resource handlers
//!
//! Each handler performs at most one downstream call and writes either JSON
//! or the raw error text.

use hyper::body::Bytes;
use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::cluster::RuleSource;
use crate::http;
use crate::logger;
use crate::plugin::ResourceResponse;

/// Fixed ping payload
const PING_BODY: &[u8] = br#"{"message": "ok"}"#;

/// Body accepted and returned by the echo route
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoMessage {
    #[serde(default, alias = "Message", alias = "MESSAGE")]
    pub message: String,
}

/// `{"message": "ok"}` for any request
pub fn ping() -> ResourceResponse {
    http::build_json_response(StatusCode::OK, Bytes::from_static(PING_BODY))
}

/// Echo a POSTed `{"message": ...}` object back to the caller
pub fn echo(method: &Method, body: &[u8]) -> ResourceResponse {
    if method != Method::POST {
        return http::build_405_response(&[Method::POST]);
    }

    // Only the first JSON value is read; anything after it is ignored
    let message = match serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<EchoMessage>>()
        .next()
    {
        Some(Ok(m)) => m.unwrap_or_default(),
        Some(Err(e)) => return http::build_error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        None => return http::build_error_response(StatusCode::BAD_REQUEST, "EOF"),
    };

    match serde_json::to_vec(&message) {
        Ok(json) => http::build_json_response(StatusCode::OK, Bytes::from(json)),
        Err(e) => http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

/// List rule resources in `namespace` and forward them unmodified
pub async fn prometheus_rules(rules: &dyn RuleSource, namespace: &str) -> ResourceResponse {
    let list = match rules.list_rules(namespace).await {
        Ok(list) => list,
        Err(e) => {
            logger::log_error(&format!("Failed to list rules in {namespace}: {e}"));
            return http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    match serde_json::to_vec(&list) {
        Ok(json) => http::build_json_response(StatusCode::OK, Bytes::from(json)),
        Err(e) => http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{forbidden, sample_rules, FakeRuleSource};
    use http_body_util::BodyExt;

    async fn body_of(resp: ResourceResponse) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_ping_body_and_type() {
        let resp = ping();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(&body_of(resp).await[..], PING_BODY);
    }

    #[tokio::test]
    async fn test_echo_identity() {
        for input in [
            r#"{"message":"hello"}"#,
            r#"{"message":""}"#,
            r#"{"message":"multi word \"quoted\""}"#,
            r#"{"message":"ünïcödé"}"#,
        ] {
            let resp = echo(&Method::POST, input.as_bytes());
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(&body_of(resp).await[..], input.as_bytes());
        }
    }

    #[tokio::test]
    async fn test_echo_drops_unknown_fields() {
        let resp = echo(&Method::POST, br#"{"message":"hi","extra":1}"#);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(&body_of(resp).await[..], br#"{"message":"hi"}"#);

        let resp = echo(&Method::POST, b"{}");
        assert_eq!(&body_of(resp).await[..], br#"{"message":""}"#);
    }

    #[tokio::test]
    async fn test_echo_non_post_never_decodes() {
        // Malformed body would be a 400 if decoding happened
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::HEAD] {
            let resp = echo(&method, b"{not json");
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(resp.headers().get("Allow").unwrap(), "POST");
            assert_eq!(&body_of(resp).await[..], b"method not allowed\n");
        }
    }

    #[tokio::test]
    async fn test_echo_malformed_json() {
        for input in [&b"{not json"[..], b"", b"  \n", br#"{"message":5}"#] {
            let resp = echo(&Method::POST, input);
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body = body_of(resp).await;
            assert!(!body.is_empty());
            assert!(serde_json::from_slice::<EchoMessage>(&body).is_err());
        }
    }

    #[tokio::test]
    async fn test_echo_reads_first_value_only() {
        for (input, expected) in [
            (&br#"{"message":"hi"} trailing"#[..], &br#"{"message":"hi"}"#[..]),
            (br#"{"message":"a"}{"message":"b"}"#, br#"{"message":"a"}"#),
            (b"null", br#"{"message":""}"#),
            (b" null\n", br#"{"message":""}"#),
        ] {
            let resp = echo(&Method::POST, input);
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(&body_of(resp).await[..], expected);
        }
    }

    #[tokio::test]
    async fn test_echo_field_name_case() {
        for input in [&br#"{"Message":"x"}"#[..], br#"{"MESSAGE":"x"}"#] {
            let resp = echo(&Method::POST, input);
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(&body_of(resp).await[..], br#"{"message":"x"}"#);
        }
    }

    #[tokio::test]
    async fn test_rules_success() {
        let source = FakeRuleSource::new(sample_rules);
        let resp = prometheus_rules(&source, "opentelemetry").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(&body_of(resp).await).unwrap();
        assert_eq!(body["metadata"]["resourceVersion"], "42");
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rules_failure() {
        let source = FakeRuleSource::new(forbidden);
        let resp = prometheus_rules(&source, "opentelemetry").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(resp).await;
        assert!(!body.is_empty());
        assert!(std::str::from_utf8(&body).unwrap().contains("Forbidden"));
        assert_eq!(source.calls(), 1);
    }
}
