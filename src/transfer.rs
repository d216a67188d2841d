use std::sync::Arc;

use crate::endpoint::{Endpoint, Requestable};
use crate::error::{BoxError, DataTransferError, NetworkError};
use crate::network::NetworkService;

/// Hook for translating network errors into domain-specific ones.
pub trait ErrorResolver: Send + Sync {
    /// Returns a substitute error, or `None` to keep the network error
    /// unchanged.
    fn resolve(&self, error: &NetworkError) -> Option<BoxError>;
}

/// Identity resolver: never substitutes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorResolver;

impl ErrorResolver for DefaultErrorResolver {
    fn resolve(&self, _error: &NetworkError) -> Option<BoxError> {
        None
    }
}

/// Side-effect-only error diagnostics at the data-transfer boundary.
pub trait TransferLogger: Send + Sync {
    fn log_error(&self, error: &(dyn std::error::Error + 'static));
}

/// Default logger emitting through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransferLogger;

impl TransferLogger for DefaultTransferLogger {
    fn log_error(&self, error: &(dyn std::error::Error + 'static)) {
        log::error!("data transfer error: {error}");
    }
}

/// Decodes network-service payloads into typed results and maps network
/// failures into the richer [`DataTransferError`] taxonomy.
///
/// Each call resolves its returned future exactly once, on the awaiting
/// task's context; pair it with [`cancellable`](crate::cancellable) for an
/// explicit cancellation handle.
#[derive(Clone)]
pub struct DataTransferService {
    network: NetworkService,
    resolver: Arc<dyn ErrorResolver>,
    logger: Arc<dyn TransferLogger>,
}

impl DataTransferService {
    pub fn new(network: NetworkService) -> Self {
        Self {
            network,
            resolver: Arc::new(DefaultErrorResolver),
            logger: Arc::new(DefaultTransferLogger),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ErrorResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TransferLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Typed path: executes the endpoint and decodes the payload with the
    /// endpoint's decoder. A success without a payload is an error here;
    /// use [`request_void`](Self::request_void) for empty-response calls.
    pub async fn request<T>(&self, endpoint: &Endpoint<T>) -> Result<T, DataTransferError> {
        match self.network.request(endpoint).await {
            Ok(Some(data)) => match endpoint.decode_response(&data) {
                Ok(value) => Ok(value),
                Err(err) => {
                    self.logger.log_error(err.as_ref());
                    Err(DataTransferError::DecodingFailed(err))
                }
            },
            Ok(None) => Err(DataTransferError::NoResponsePayload),
            Err(err) => Err(self.resolve(err)),
        }
    }

    /// Void path: identical flow without decoding; an empty payload is a
    /// valid success.
    pub async fn request_void(&self, endpoint: &dyn Requestable) -> Result<(), DataTransferError> {
        match self.network.request(endpoint).await {
            Ok(_) => Ok(()),
            Err(err) => Err(self.resolve(err)),
        }
    }

    fn resolve(&self, error: NetworkError) -> DataTransferError {
        self.logger.log_error(&error);
        match self.resolver.resolve(&error) {
            None => DataTransferError::NetworkFailure(error),
            Some(substitute) => DataTransferError::ResolvedFailure(substitute),
        }
    }
}
