//! Remote chain status provider

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::chain::RemoteSnapshot;

/// Default base URL of the status provider
pub const DEFAULT_API_URL: &str = "https://api.torn.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures while fetching a snapshot. None of them are fatal; the next
/// scheduled poll simply tries again.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("API key is not set")]
    MissingCredential,

    #[error("Request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Provider returned HTTP {0}")]
    Http(u16),

    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Error payload reported by the provider; displays its message verbatim
    #[error("{message}")]
    Provider { code: i64, message: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the credential in its query string
        FetchError::Transport(err.without_url())
    }
}

/// Source of remote chain snapshots
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Fetch the current chain status.
    ///
    /// `Ok(None)` means the provider answered without anything usable, which
    /// is not a fault.
    async fn fetch(&self, credential: &str) -> Result<Option<RemoteSnapshot>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    chain: Option<ChainPayload>,
    error: Option<ErrorPayload>,
}

#[derive(Debug, Deserialize)]
struct ChainPayload {
    current: Option<u32>,
    timeout: Option<u32>,
    cooldown: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    code: i64,
    #[serde(default, alias = "error")]
    message: String,
}

/// Decode a provider response body.
///
/// An error payload wins over any chain payload next to it. A missing or
/// incomplete chain object is a benign no-op.
pub fn parse_response(body: &str) -> Result<Option<RemoteSnapshot>, FetchError> {
    let response: ProviderResponse = serde_json::from_str(body)?;

    if let Some(error) = response.error {
        let message = if error.message.is_empty() {
            format!("Provider error {}", error.code)
        } else {
            error.message
        };
        return Err(FetchError::Provider {
            code: error.code,
            message,
        });
    }

    let Some(chain) = response.chain else {
        debug!("Response carried no chain object");
        return Ok(None);
    };

    match (chain.current, chain.timeout, chain.cooldown) {
        (Some(current), Some(timeout), Some(cooldown)) => {
            Ok(Some(RemoteSnapshot::new(current, timeout, cooldown)))
        }
        _ => {
            debug!("Chain object incomplete: {:?}", chain);
            Ok(None)
        }
    }
}

/// Provider backed by the game's HTTP API
#[derive(Debug, Clone)]
pub struct HttpStatusProvider {
    client: Client,
    base_url: String,
}

impl HttpStatusProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn chain_url(&self) -> String {
        format!("{}/faction/", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl StatusProvider for HttpStatusProvider {
    async fn fetch(&self, credential: &str) -> Result<Option<RemoteSnapshot>, FetchError> {
        if credential.is_empty() {
            return Err(FetchError::MissingCredential);
        }

        let response = self
            .client
            .get(self.chain_url())
            .query(&[("selections", "chain"), ("key", credential)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Http(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;

    #[test]
    fn parses_chain_payload() {
        let body = r#"{"chain":{"current":12,"max":25,"timeout":245,"modifier":1.0,"cooldown":0}}"#;
        let snapshot = parse_response(body).unwrap();
        assert_eq!(snapshot, Some(RemoteSnapshot::new(12, 245, 0)));
    }

    #[test]
    fn provider_error_is_surfaced_verbatim() {
        let body = r#"{"error":{"code":2,"message":"Invalid key"}}"#;
        let err = parse_response(body).unwrap_err();
        assert_eq!(err.to_string(), "Invalid key");
        assert!(matches!(err, FetchError::Provider { code: 2, .. }));
    }

    #[test]
    fn provider_error_field_alias() {
        let body = r#"{"error":{"code":2,"error":"Incorrect key"}}"#;
        assert_eq!(parse_response(body).unwrap_err().to_string(), "Incorrect key");
    }

    #[test]
    fn provider_error_without_message_keeps_code() {
        let err = parse_response(r#"{"error":{"code":9}}"#).unwrap_err();
        assert!(matches!(err, FetchError::Provider { code: 9, .. }));
        assert_eq!(err.to_string(), "Provider error 9");
    }

    #[test]
    fn error_wins_over_chain() {
        let body = r#"{"chain":{"current":1,"timeout":100,"cooldown":0},"error":{"code":5,"message":"Too many requests"}}"#;
        assert_eq!(parse_response(body).unwrap_err().to_string(), "Too many requests");
    }

    #[test]
    fn missing_chain_is_benign() {
        assert_eq!(parse_response("{}").unwrap(), None);
        assert_eq!(parse_response(r#"{"faction":{}}"#).unwrap(), None);
    }

    #[test]
    fn incomplete_chain_is_benign() {
        assert_eq!(parse_response(r#"{"chain":{"current":3}}"#).unwrap(), None);
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = parse_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn empty_credential_skips_request() {
        let provider = HttpStatusProvider::new("http://127.0.0.1:9").unwrap();
        let err = provider.fetch("").await.unwrap_err();
        assert!(matches!(err, FetchError::MissingCredential));
    }

    fn chain_query(key: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("selections".into(), "chain".into()),
            Matcher::UrlEncoded("key".into(), key.into()),
        ])
    }

    #[tokio::test]
    async fn fetch_requests_chain_selection_and_decodes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/faction/")
            .match_query(chain_query("abc123"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"chain":{"current":7,"timeout":180,"cooldown":0}}"#)
            .create_async()
            .await;

        let provider = HttpStatusProvider::new(server.url()).unwrap();
        let snapshot = provider.fetch("abc123").await.unwrap();

        assert_eq!(snapshot, Some(RemoteSnapshot::new(7, 180, 0)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_surfaces_provider_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/faction/")
            .match_query(chain_query("wrong"))
            .with_status(200)
            .with_body(r#"{"error":{"code":2,"message":"Invalid key"}}"#)
            .create_async()
            .await;

        let provider = HttpStatusProvider::new(server.url()).unwrap();
        let err = provider.fetch("wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid key");
    }

    #[tokio::test]
    async fn fetch_maps_non_success_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/faction/")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let provider = HttpStatusProvider::new(server.url()).unwrap();
        let err = provider.fetch("abc123").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(503)));
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_key() {
        // Nothing listens on the discard port
        let provider = HttpStatusProvider::new("http://127.0.0.1:9").unwrap();
        let err = provider.fetch("topsecret").await.unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
        let shown = format!("{} {:?}", err, err);
        assert!(!shown.contains("topsecret"));
    }

    #[test]
    fn chain_url_trims_trailing_slash() {
        let provider = HttpStatusProvider::new("https://example.test/").unwrap();
        assert_eq!(provider.chain_url(), "https://example.test/faction/");
    }
}
