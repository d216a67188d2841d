use std::future::Future;

use futures::future::{AbortHandle, Abortable, Aborted};

use crate::error::{DataTransferError, NetworkError};

/// Opaque token for an in-flight request. Cancelling is idempotent and
/// cooperative: it prevents any later non-cancellation outcome from being
/// observed, without claiming the underlying transfer stops instantly.
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    inner: AbortHandle,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.inner.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_aborted()
    }
}

/// Pairs a transfer future with a [`CancellationHandle`]. Once the handle
/// is cancelled, the future resolves to `NetworkFailure(Cancelled)` instead
/// of any pending success or failure.
pub fn cancellable<T>(
    future: impl Future<Output = Result<T, DataTransferError>>,
) -> (
    impl Future<Output = Result<T, DataTransferError>>,
    CancellationHandle,
) {
    let (handle, registration) = AbortHandle::new_pair();
    let wrapped = Abortable::new(future, registration);
    let resolved = async move {
        match wrapped.await {
            Ok(result) => result,
            Err(Aborted) => Err(DataTransferError::NetworkFailure(NetworkError::Cancelled)),
        }
    };
    (resolved, CancellationHandle { inner: handle })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::config::NetworkConfig;
    use crate::endpoint::Endpoint;
    use crate::network::NetworkService;
    use crate::transfer::DataTransferService;
    use crate::transport::{SessionTransport, TransportError, TransportReply, TransportRequest};

    /// Transport whose call never completes.
    struct StalledTransport;

    #[async_trait]
    impl SessionTransport for StalledTransport {
        async fn execute(
            &self,
            _request: TransportRequest,
        ) -> Result<TransportReply, TransportError> {
            futures::future::pending().await
        }
    }

    fn stalled_service() -> DataTransferService {
        let config = NetworkConfig::new("https://api.example.com").unwrap();
        DataTransferService::new(NetworkService::with_transport(
            config,
            Arc::new(StalledTransport),
        ))
    }

    #[tokio::test]
    async fn cancel_before_completion_yields_cancelled() {
        let service = stalled_service();
        let (future, handle) = cancellable(async move {
            let endpoint = Endpoint::<serde_json::Value>::get("movies");
            service.request(&endpoint).await
        });

        let task = tokio::spawn(future);
        handle.cancel();
        let result = task.await.unwrap();
        assert!(matches!(
            result,
            Err(DataTransferError::NetworkFailure(NetworkError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let service = stalled_service();
        let (future, handle) = cancellable(async move {
            let endpoint = Endpoint::<serde_json::Value>::get("movies");
            service.request(&endpoint).await
        });

        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        let result = future.await;
        assert!(matches!(
            result,
            Err(DataTransferError::NetworkFailure(NetworkError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn uncancelled_future_completes_normally() {
        let config = NetworkConfig::new("https://api.example.com").unwrap();

        struct EmptyOk;

        #[async_trait]
        impl SessionTransport for EmptyOk {
            async fn execute(
                &self,
                _request: TransportRequest,
            ) -> Result<TransportReply, TransportError> {
                Ok(TransportReply {
                    status: Some(204),
                    body: None,
                })
            }
        }

        let service = DataTransferService::new(NetworkService::with_transport(
            config,
            Arc::new(EmptyOk),
        ));
        let (future, _handle) = cancellable(async move {
            let endpoint = Endpoint::<()>::get("ping");
            service.request_void(&endpoint).await
        });
        future.await.unwrap();
    }
}
