//! HTTP client for the L7 protection API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, Result};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("l7sync-sdk/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout. The service is slow to apply TLS material,
/// so this is deliberately generous.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the L7 protection API v1.
///
/// An immutable value holding the endpoint, the bearer token and a
/// connection pool. Construct it once and pass it by reference into every
/// call; cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl Client {
    /// Create a client with the default request timeout.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, token, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout. The timeout is
    /// the deadline for every individual remote call made through this
    /// client.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Probe connectivity and credentials with a cheap read.
    pub async fn echo(&self) -> Result<()> {
        let _: serde_json::Value = self.get(crate::l7resource::RESOURCE_PATH).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        self.send(self.http.get(self.url(path))).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(path, ?query, "GET");
        self.send(self.http.get(self.url(path)).query(query)).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!(path, "POST");
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!(path, "PUT");
        self.send(self.http.put(self.url(path)).json(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!(path, "DELETE");
        self.send(self.http.delete(self.url(path)).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body));
        }

        let envelope: Envelope<T> =
            serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(envelope.data.result)
    }
}

/// Successful responses wrap their payload twice: `{"data":{"result":…}}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: EnvelopeData<T>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData<T> {
    result: T,
}

/// Error bodies are `{"error": "message"}`; 404 is the only status with a
/// dedicated kind.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
}

fn error_from_response(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    if status == 404 {
        ApiError::NotFound(message)
    } else {
        ApiError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_unwraps_nested_result() {
        let body = r#"{"data":{"result":{"id":42,"ip":"10.0.0.1"}}}"#;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.result["id"], 42);
        assert_eq!(envelope.data.result["ip"], "10.0.0.1");
    }

    #[test]
    fn envelope_unwraps_string_result() {
        let body = r#"{"data":{"result":"ok"}}"#;
        let envelope: Envelope<String> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.result, "ok");
    }

    #[test]
    fn not_found_maps_to_its_own_kind() {
        let err = error_from_response(404, br#"{"error":"no such resource"}"#);
        assert!(matches!(err, ApiError::NotFound(m) if m == "no such resource"));
    }

    #[test]
    fn other_statuses_map_to_generic_api_error() {
        let err = error_from_response(500, br#"{"error":"boom"}"#);
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unparseable_error_body_falls_back_to_raw_text() {
        let err = error_from_response(502, b"bad gateway");
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
