use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::NetworkConfig;
use crate::error::{BoxError, NetworkError};
use crate::transport::TransportRequest;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// How the body parameter map is turned into request bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    /// Serialize the map as a JSON document.
    #[default]
    Json,
    /// Render the map as a plain `key=value&key=value` string, for
    /// raw-text payloads. Values are not percent-encoded.
    Text,
}

/// Turns raw response bytes into a typed value.
pub trait ResponseDecoder<T>: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<T, BoxError>;
}

/// Default decoder: deserializes JSON response bodies via serde.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl<T: DeserializeOwned> ResponseDecoder<T> for JsonDecoder {
    fn decode(&self, data: &[u8]) -> Result<T, BoxError> {
        serde_json::from_slice(data).map_err(Into::into)
    }
}

/// Passes the response bytes through untouched, for binary payloads such
/// as image data.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDataDecoder;

impl ResponseDecoder<Bytes> for RawDataDecoder {
    fn decode(&self, data: &[u8]) -> Result<Bytes, BoxError> {
        Ok(Bytes::copy_from_slice(data))
    }
}

/// Query or body parameters: either an explicit map, or a structured
/// object captured at builder time. At most one of the two is ever
/// populated for a given slot.
#[derive(Debug, Default)]
enum Parameters {
    #[default]
    Empty,
    Map(BTreeMap<String, Value>),
    /// `serde_json::to_value` result of the structured object; a capture
    /// failure surfaces as `UrlGeneration` when the request is built.
    Object(Result<Value, serde_json::Error>),
}

impl Parameters {
    fn entries(&self) -> Result<Vec<(String, Value)>, NetworkError> {
        match self {
            Parameters::Empty => Ok(Vec::new()),
            Parameters::Map(map) => {
                Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }
            Parameters::Object(Ok(Value::Object(map))) => {
                Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }
            Parameters::Object(Ok(other)) => {
                log::debug!("structured parameters must serialize to an object, got {other}");
                Err(NetworkError::UrlGeneration)
            }
            Parameters::Object(Err(err)) => {
                log::debug!("structured parameter serialization failed: {err}");
                Err(NetworkError::UrlGeneration)
            }
        }
    }

    fn insert(&mut self, key: String, value: Value) {
        match self {
            Parameters::Map(map) => {
                map.insert(key, value);
            }
            _ => {
                *self = Parameters::Map(BTreeMap::from([(key, value)]));
            }
        }
    }
}

/// Anything that can be resolved into a transport request against a
/// network configuration.
pub trait Requestable: Send + Sync {
    fn transport_request(&self, config: &NetworkConfig)
        -> Result<TransportRequest, NetworkError>;
}

/// Declarative description of one HTTP request producing an `R`.
///
/// Built per call-site and immutable after construction. Endpoint headers
/// and query parameters override the configuration defaults on collision.
pub struct Endpoint<R> {
    path: String,
    is_full_path: bool,
    method: HttpMethod,
    header_params: BTreeMap<String, String>,
    query: Parameters,
    body: Parameters,
    body_encoding: BodyEncoding,
    decoder: Arc<dyn ResponseDecoder<R>>,
}

impl<R: DeserializeOwned + 'static> Endpoint<R> {
    /// Creates an endpoint with the default JSON response decoder.
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self::with_decoder(path, method, Arc::new(JsonDecoder))
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Get)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Post)
    }
}

impl<R> Endpoint<R> {
    /// Creates an endpoint with an explicit response decoder.
    pub fn with_decoder(
        path: impl Into<String>,
        method: HttpMethod,
        decoder: Arc<dyn ResponseDecoder<R>>,
    ) -> Self {
        Self {
            path: path.into(),
            is_full_path: false,
            method,
            header_params: BTreeMap::new(),
            query: Parameters::Empty,
            body: Parameters::Empty,
            body_encoding: BodyEncoding::default(),
            decoder,
        }
    }

    /// Treats `path` as a complete URL, bypassing the configured base URL.
    pub fn full_path(mut self) -> Self {
        self.is_full_path = true;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_params.insert(name.into(), value.into());
        self
    }

    pub fn query_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Supplies query parameters as a structured object. Replaces any
    /// explicit query parameter map set before it.
    pub fn query_object<Q: Serialize>(mut self, query: &Q) -> Self {
        self.query = Parameters::Object(serde_json::to_value(query));
        self
    }

    pub fn body_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    /// Supplies the body as a structured object. Replaces any explicit
    /// body parameter map set before it.
    pub fn body_object<B: Serialize>(mut self, body: &B) -> Self {
        self.body = Parameters::Object(serde_json::to_value(body));
        self
    }

    pub fn body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = encoding;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decodes a response payload with this endpoint's decoder.
    pub fn decode_response(&self, data: &[u8]) -> Result<R, BoxError> {
        self.decoder.decode(data)
    }

    fn resolve_url(&self, config: &NetworkConfig) -> Result<Url, NetworkError> {
        let raw = if self.is_full_path {
            self.path.clone()
        } else {
            let base = config.base_url().as_str();
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                self.path.trim_start_matches('/')
            )
        };
        Url::parse(&raw).map_err(|err| {
            log::debug!("request URL generation failed for {raw:?}: {err}");
            NetworkError::UrlGeneration
        })
    }

    fn encode_body(&self) -> Result<Option<Vec<u8>>, NetworkError> {
        let entries = self.body.entries()?;
        if entries.is_empty() {
            return Ok(None);
        }
        let map: serde_json::Map<String, Value> = entries.into_iter().collect();
        match self.body_encoding {
            BodyEncoding::Json => match serde_json::to_vec(&map) {
                Ok(body) => Ok(Some(body)),
                Err(err) => {
                    log::debug!("body serialization failed: {err}");
                    Err(NetworkError::UrlGeneration)
                }
            },
            BodyEncoding::Text => {
                let rendered = map
                    .iter()
                    .map(|(k, v)| format!("{k}={}", render_value(v)))
                    .collect::<Vec<_>>()
                    .join("&");
                Ok(Some(rendered.into_bytes()))
            }
        }
    }
}

impl<R> Requestable for Endpoint<R> {
    fn transport_request(
        &self,
        config: &NetworkConfig,
    ) -> Result<TransportRequest, NetworkError> {
        let mut url = self.resolve_url(config)?;

        // Config defaults first, endpoint values override on collision.
        let mut query: BTreeMap<String, String> = config.query_parameters().clone();
        for (key, value) in self.query.entries()? {
            query.insert(key, render_value(&value));
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = config.headers().clone();
        headers.extend(self.header_params.clone());

        let body = self.encode_body()?;

        Ok(TransportRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }
}

/// Renders a parameter value for use in a URL query or raw-text body:
/// strings verbatim, everything else in its JSON form.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
