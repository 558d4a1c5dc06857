//! Reqwest-backed confessions API adapter.
//!
//! This adapter owns transport details only: URL building, timeout and HTTP
//! error mapping, and JSON decoding of the response envelopes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::{ClientError, ConfessionsApi};
use crate::wire::{
    ConfessionBody, CreatedEnvelope, ErrorEnvelope, ListEnvelope, ListedConfession,
    SubmissionPayload,
};

const CONFESSIONS_PATH: &str = "api/confessions";
const GENERIC_SAVE_ERROR: &str = "Failed to save confession";

/// Confessions API client that talks to one server.
#[derive(Debug, Clone)]
pub struct HttpConfessionsClient {
    client: Client,
    endpoint: Url,
}

impl HttpConfessionsClient {
    /// Build a client for the server at `base` with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when `base` cannot be a base URL or the reqwest
    /// client cannot be constructed.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint = confessions_endpoint(base)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ConfessionsApi for HttpConfessionsClient {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<ConfessionBody, ClientError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        let envelope: CreatedEnvelope = decode(body.as_ref())?;
        Ok(envelope.confession)
    }

    async fn list(&self, limit: Option<u32>) -> Result<Vec<ListedConfession>, ClientError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        let envelope: ListEnvelope = decode(body.as_ref())?;
        Ok(envelope.confessions)
    }
}

fn confessions_endpoint(base: &Url) -> Result<Url, ClientError> {
    if base.cannot_be_a_base() {
        return Err(ClientError::transport(format!(
            "'{base}' cannot be used as a base URL"
        )));
    }
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(CONFESSIONS_PATH)
        .map_err(|err| ClientError::transport(format!("invalid endpoint: {err}")))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body)
        .map_err(|err| ClientError::decode(format!("invalid confessions payload: {err}")))
}

fn map_transport_error(error: reqwest::Error) -> ClientError {
    ClientError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_SAVE_ERROR.to_owned());
    ClientError::rejected(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:3000", "http://localhost:3000/api/confessions")]
    #[case("http://localhost:3000/", "http://localhost:3000/api/confessions")]
    #[case(
        "https://example.test/confess",
        "https://example.test/confess/api/confessions"
    )]
    fn endpoint_is_joined_under_the_base(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base");
        let client =
            HttpConfessionsClient::new(&base, Duration::from_secs(1)).expect("client builds");
        assert_eq!(client.endpoint().as_str(), expected);
    }

    #[rstest]
    fn data_urls_are_rejected() {
        let base = Url::parse("data:text/plain,hello").expect("valid url");
        let err = confessions_endpoint(&base).expect_err("not a base");
        assert!(matches!(err, ClientError::Transport { .. }));
    }

    #[rstest]
    #[case(
        StatusCode::BAD_REQUEST,
        br#"{"error":"Please write your confession before submitting"}"#.as_slice(),
        "Please write your confession before submitting"
    )]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>".as_slice(), GENERIC_SAVE_ERROR)]
    #[case(StatusCode::BAD_GATEWAY, br#"{"error":""}"#.as_slice(), GENERIC_SAVE_ERROR)]
    fn status_errors_carry_the_server_message(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        assert_eq!(
            map_status_error(status, body),
            ClientError::rejected(status.as_u16(), expected)
        );
    }

    #[rstest]
    fn list_envelopes_decode() {
        let body = br#"{"success":true,"confessions":[{
            "id":"confession_1_abc",
            "confession":"I never read the terms",
            "category":"uncategorized",
            "recipient":"B Kosal",
            "timestamp":"2025-01-01T00:00:00Z"
        }]}"#;

        let envelope: ListEnvelope = decode(body).expect("decodes");
        assert_eq!(envelope.confessions.len(), 1);
        assert_eq!(
            envelope
                .confessions
                .first()
                .map(|body| body.confession.as_str()),
            Some("I never read the terms")
        );
    }

    #[rstest]
    fn malformed_bodies_are_decode_errors() {
        let err = decode::<ListEnvelope>(b"{\"success\":true").expect_err("truncated");
        assert!(matches!(err, ClientError::Decode { .. }));
    }
}
