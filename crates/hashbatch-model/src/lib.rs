//! Model types for hashbatch.
//!
//! This crate holds everything that crosses the wire: the request items, the
//! in-place batch decoder, the response and health payloads, and the error
//! taxonomy shared by the HTTP and core layers.

pub mod error;
pub mod model;

pub use error::{HashBatchError, HashBatchErrorCode};
pub use model::{Batch, BatchSeed, HashResponse, HealthReport, Item, PoolStats, decode_batch};
