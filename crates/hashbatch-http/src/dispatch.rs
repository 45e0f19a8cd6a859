//! Batch handler trait and dispatch.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use hashbatch_model::{HashBatchError, HealthReport};

/// Trait that the batch hashing business logic must implement.
///
/// The handler receives the still-unread request body and returns the
/// serialized JSON response. Reading the body is left to the handler so it
/// can drain it straight into its own pooled buffer. This trait serves as the
/// boundary between the HTTP transport layer and the business logic layer.
pub trait BatchHandler: Send + Sync + 'static {
    /// Read, decode and hash one request body, producing the response JSON.
    fn handle_batch<B>(
        &self,
        body: B,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, HashBatchError>> + Send + '_>>
    where
        B: http_body::Body<Data = Bytes> + Send + Unpin + 'static,
        B::Error: std::fmt::Display + Send;

    /// Snapshot of the handler's health for the diagnostic endpoint.
    fn health(&self) -> HealthReport;
}

/// Dispatch a batch request body to the handler.
pub async fn dispatch_batch<H, B>(handler: &H, body: B) -> Result<Bytes, HashBatchError>
where
    H: BatchHandler,
    B: http_body::Body<Data = Bytes> + Send + Unpin + 'static,
    B::Error: std::fmt::Display + Send,
{
    tracing::debug!("dispatching hash batch request");
    handler.handle_batch(body).await
}
