//! Handler bridging the HTTP layer to the batch processor.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;

use hashbatch_http::dispatch::BatchHandler;
use hashbatch_model::{HashBatchError, HealthReport};

use crate::processor::BatchProcessor;

/// Handler that bridges the HTTP layer to a shared [`BatchProcessor`].
#[derive(Debug)]
pub struct HashBatchHandler {
    processor: Arc<BatchProcessor>,
}

impl HashBatchHandler {
    /// Create a new handler wrapping a processor.
    #[must_use]
    pub fn new(processor: Arc<BatchProcessor>) -> Self {
        Self { processor }
    }
}

impl BatchHandler for HashBatchHandler {
    fn handle_batch<B>(
        &self,
        body: B,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, HashBatchError>> + Send + '_>>
    where
        B: http_body::Body<Data = Bytes> + Send + Unpin + 'static,
        B::Error: std::fmt::Display + Send,
    {
        Box::pin(self.processor.process(body))
    }

    fn health(&self) -> HealthReport {
        self.processor.health()
    }
}
