//! Per-request batch processing.
//!
//! One request runs through:
//!
//! ```text
//! acquire buffer -> read body -> acquire batch -> decode -> hash -> encode
//! ```
//!
//! The buffer that received the body is cleared and reused to stage the
//! encoded response. Both pooled values are released when their guards go
//! out of scope, on success and on every error path.

use bytes::Bytes;
use http_body_util::BodyExt;

use hashbatch_model::{Batch, HashBatchError, HashResponse, HealthReport, decode_batch};

use crate::config::PoolConfig;
use crate::pipeline::hash_batch;
use crate::pool::Pool;

/// Owns the request pools and runs the hashing pipeline.
#[derive(Debug)]
pub struct BatchProcessor {
    buffers: Pool<Vec<u8>>,
    batches: Pool<Batch>,
}

impl BatchProcessor {
    /// Create a processor with pools sized by `config`.
    #[must_use]
    pub fn new(config: &PoolConfig) -> Self {
        let buffer_capacity = config.buffer_capacity;
        let batch_capacity = config.batch_capacity;
        let new_buffer = move || Vec::with_capacity(buffer_capacity);
        let new_batch = move || Batch::with_capacity(batch_capacity);

        let (buffers, batches) = if config.prefill {
            (
                Pool::prefilled(config.pool_size, new_buffer),
                Pool::prefilled(config.pool_size, new_batch),
            )
        } else {
            (
                Pool::new(config.pool_size, new_buffer),
                Pool::new(config.pool_size, new_batch),
            )
        };

        Self { buffers, batches }
    }

    /// Hash one request body, returning the serialized response.
    pub async fn process<B>(&self, body: B) -> Result<Bytes, HashBatchError>
    where
        B: http_body::Body<Data = Bytes> + Unpin,
        B::Error: std::fmt::Display,
    {
        let mut buffer = self.buffers.acquire();
        read_body(body, &mut buffer).await?;

        let mut batch = self.batches.acquire();
        decode_batch(&buffer, &mut batch)?;

        let mut response = HashResponse {
            hashes: Vec::with_capacity(batch.len()),
        };
        hash_batch(&batch, &mut response.hashes);

        buffer.clear();
        serde_json::to_writer(&mut *buffer, &response).map_err(HashBatchError::encode)?;

        tracing::debug!(
            items = batch.len(),
            response_bytes = buffer.len(),
            "hashed batch"
        );
        Ok(Bytes::copy_from_slice(&buffer))
    }

    /// Current pool statistics.
    #[must_use]
    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "running".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            buffers: self.buffers.stats(),
            batches: self.batches.stats(),
        }
    }
}

/// Drain `body` into `buffer`, frame by frame.
pub async fn read_body<B>(mut body: B, buffer: &mut Vec<u8>) -> Result<(), HashBatchError>
where
    B: http_body::Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    while let Some(frame) = body.frame().await {
        let frame =
            frame.map_err(|e| HashBatchError::read(format!("failed to read request body: {e}")))?;
        if let Ok(data) = frame.into_data() {
            buffer.extend_from_slice(&data);
        }
    }
    Ok(())
}
