use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use url::Url;

use crate::endpoint::HttpMethod;
use crate::error::BoxError;

/// A fully resolved request: absolute URL, merged headers and serialized
/// body, derived deterministically from an endpoint and a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

/// Raw outcome of one transport call: optional payload bytes plus the HTTP
/// status code when one was received.
#[derive(Debug, Clone, Default)]
pub struct TransportReply {
    pub status: Option<u16>,
    pub body: Option<Bytes>,
}

/// Transport-level failure causes, before classification into
/// [`NetworkError`](crate::NetworkError).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    NotConnected(String),
    #[error("request cancelled")]
    Cancelled,
    #[error(transparent)]
    Other(BoxError),
}

/// Seam over the underlying HTTP client: performs exactly one network call
/// per invocation, no retries, no caching. Replaceable for testing.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportReply, TransportError>;
}

/// Default transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already configured client (timeouts, proxies, TLS).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportReply, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(classify_reqwest_error)?;

        Ok(TransportReply {
            status: Some(status),
            body: if body.is_empty() { None } else { Some(body) },
        })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() {
        TransportError::NotConnected(err.to_string())
    } else {
        TransportError::Other(Box::new(err))
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_conversion_covers_all_verbs() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(
            reqwest::Method::from(HttpMethod::Delete),
            reqwest::Method::DELETE
        );
    }

    #[test]
    fn empty_reply_has_no_payload() {
        let reply = TransportReply::default();
        assert!(reply.status.is_none());
        assert!(reply.body.is_none());
    }
}
