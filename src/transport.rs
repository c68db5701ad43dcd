// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use async_trait::async_trait;
use http::{header::AUTHORIZATION, Method};
use reqwest::{Client as ReqwestClient, Response};
use serde_json::Value;
use tracing::debug;

use crate::Result;

/// How the caller intends to consume the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// The body is read completely before returning.
    Buffered,
    /// The response is handed back unread so its body can be piped onward.
    Stream,
}

/// Everything a transport needs to issue one authenticated call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// JSON body, if any.
    pub body: Option<Value>,
    pub response_mode: ResponseMode,
}

/// The HTTP capability the client delegates network calls to.
///
/// Implementations report transport-level failures (including non-2xx
/// statuses) as errors and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Raw response returned for streamed downloads.
    type Response: Send;

    async fn send(&self, request: TransportRequest) -> Result<Self::Response>;

    async fn read_body(&self, response: Self::Response) -> Result<String>;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: ReqwestClient,
}

impl ReqwestTransport {
    /// Constructs a new `ReqwestTransport`.
    ///
    /// This method calls reqwest::Client::new() internally.
    pub fn new() -> Self {
        ReqwestTransport {
            inner: ReqwestClient::new(),
        }
    }

    /// Constructs a new `ReqwestTransport` with specifying inner `reqwest::Client`.
    ///
    /// Timeouts and proxies configured on `client` apply to every call.
    pub fn new_with_client(client: ReqwestClient) -> Self {
        ReqwestTransport { inner: client }
    }
}

impl From<ReqwestClient> for ReqwestTransport {
    fn from(client: ReqwestClient) -> Self {
        ReqwestTransport::new_with_client(client)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Response = Response;

    async fn send(&self, request: TransportRequest) -> Result<Response> {
        debug!(
            method = %request.method,
            url = %request.url,
            mode = ?request.response_mode,
            "sending request"
        );
        let mut builder = self
            .inner
            .request(request.method, request.url.as_str())
            .header(AUTHORIZATION, request.authorization);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await?.error_for_status()?;
        Ok(response)
    }

    async fn read_body(&self, response: Response) -> Result<String> {
        Ok(response.text().await?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_from_reqwest_client() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let _transport: ReqwestTransport = client.into();
    }

    #[tokio::test]
    async fn connection_errors_surface_unchanged() {
        let transport = ReqwestTransport::new();
        let result = transport
            .send(TransportRequest {
                method: Method::GET,
                url: "http://127.0.0.1:9/v1/oauth/request_token".to_string(),
                authorization: "OAuth realm=\"Schoology API\"".to_string(),
                body: None,
                response_mode: ResponseMode::Buffered,
            })
            .await;
        assert!(matches!(result, Err(crate::Error::Reqwest(_))));
    }
}
