//! Core batch hashing logic for hashbatch.
//!
//! Two bounded pools (request buffers and decoded item batches) sit in front
//! of a stateless SHA-256/base64 pipeline. [`BatchProcessor`] owns the pools
//! and runs one request end to end; [`HashBatchHandler`] plugs it into the
//! HTTP layer.

pub mod config;
pub mod handler;
pub mod pipeline;
pub mod pool;
pub mod processor;

pub use config::{ConfigError, HashBatchConfig, PoolConfig};
pub use handler::HashBatchHandler;
pub use pool::{Pool, Pooled, Recycle};
pub use processor::BatchProcessor;
