//! Declarative HTTP request descriptions decoded into typed domain
//! objects.
//!
//! An [`Endpoint`] describes one request (path, method, parameters and
//! response decoder); a [`NetworkService`] resolves it against a shared
//! [`NetworkConfig`], executes it through a pluggable [`SessionTransport`]
//! and classifies failures; a [`DataTransferService`] decodes successful
//! payloads and maps network failures into the caller-facing
//! [`DataTransferError`] taxonomy. Retry policy stays with the caller.

pub mod cancel;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod network;
pub mod transfer;
pub mod transport;

// Re-export commonly used types
pub use cancel::{cancellable, CancellationHandle};
pub use config::NetworkConfig;
pub use endpoint::{
    BodyEncoding, Endpoint, HttpMethod, JsonDecoder, RawDataDecoder, Requestable, ResponseDecoder,
};
pub use error::{BoxError, DataTransferError, NetworkError};
pub use network::{DefaultNetworkLogger, NetworkLogger, NetworkService};
pub use transfer::{
    DataTransferService, DefaultErrorResolver, DefaultTransferLogger, ErrorResolver,
    TransferLogger,
};
pub use transport::{
    ReqwestTransport, SessionTransport, TransportError, TransportReply, TransportRequest,
};
