use std::sync::Arc;

use bytes::Bytes;

use crate::config::NetworkConfig;
use crate::endpoint::Requestable;
use crate::error::NetworkError;
use crate::transport::{
    ReqwestTransport, SessionTransport, TransportError, TransportReply, TransportRequest,
};

/// Side-effect-only diagnostics hooks at the network boundary. Must never
/// fail and must not block the caller.
pub trait NetworkLogger: Send + Sync {
    fn log_request(&self, request: &TransportRequest);
    fn log_response(&self, status: Option<u16>, body: Option<&Bytes>);
    fn log_error(&self, error: &NetworkError);
}

/// Default logger emitting through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNetworkLogger;

impl NetworkLogger for DefaultNetworkLogger {
    fn log_request(&self, request: &TransportRequest) {
        log::debug!("--> {} {}", request.method.as_str(), request.url);
        if !request.headers.is_empty() {
            log::debug!("headers: {:?}", request.headers);
        }
        if let Some(body) = &request.body {
            log::debug!("body: {}", String::from_utf8_lossy(body));
        }
    }

    fn log_response(&self, status: Option<u16>, body: Option<&Bytes>) {
        match status {
            Some(status) => log::debug!("<-- {status}"),
            None => log::debug!("<-- (no status)"),
        }
        if let Some(body) = body {
            log::debug!("response: {}", String::from_utf8_lossy(body));
        }
    }

    fn log_error(&self, error: &NetworkError) {
        log::error!("network error: {error}");
    }
}

/// Turns endpoint descriptions into transport calls, classifies transport
/// failures into [`NetworkError`] and logs every request, response and
/// error passing the boundary.
#[derive(Clone)]
pub struct NetworkService {
    config: NetworkConfig,
    transport: Arc<dyn SessionTransport>,
    logger: Arc<dyn NetworkLogger>,
}

impl NetworkService {
    /// Service backed by the default reqwest transport.
    pub fn new(config: NetworkConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: NetworkConfig, transport: Arc<dyn SessionTransport>) -> Self {
        Self {
            config,
            transport,
            logger: Arc::new(DefaultNetworkLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn NetworkLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Executes one request. A request that cannot be built fails with
    /// `UrlGeneration` before anything is sent; replies with a non-2xx
    /// status fail with `HttpStatus`.
    pub async fn request(
        &self,
        endpoint: &dyn Requestable,
    ) -> Result<Option<Bytes>, NetworkError> {
        let request = match endpoint.transport_request(&self.config) {
            Ok(request) => request,
            Err(err) => {
                self.logger.log_error(&err);
                return Err(err);
            }
        };

        self.logger.log_request(&request);
        match self.transport.execute(request).await {
            Ok(reply) => self.classify_reply(reply),
            Err(err) => {
                let err = classify_transport_error(err);
                self.logger.log_error(&err);
                Err(err)
            }
        }
    }

    fn classify_reply(&self, reply: TransportReply) -> Result<Option<Bytes>, NetworkError> {
        match reply.status {
            // Status-code check alone decides: an error response is an
            // HttpStatus failure whether or not the transport objected.
            Some(status) if !(200..300).contains(&status) => {
                let err = NetworkError::HttpStatus {
                    status,
                    body: reply.body,
                };
                self.logger.log_error(&err);
                Err(err)
            }
            _ => {
                self.logger.log_response(reply.status, reply.body.as_ref());
                Ok(reply.body)
            }
        }
    }
}

fn classify_transport_error(err: TransportError) -> NetworkError {
    match err {
        TransportError::NotConnected(_) => NetworkError::NotConnected,
        TransportError::Cancelled => NetworkError::Cancelled,
        TransportError::Other(inner) => NetworkError::Generic(inner),
    }
}
