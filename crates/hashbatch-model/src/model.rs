//! Request, response and diagnostic payloads.
//!
//! A request body is a JSON array of two-string objects:
//!
//! ```json
//! [{"str_a": "foo", "str_b": "bar"}]
//! ```
//!
//! and a response body carries one encoded digest per item, in input order:
//!
//! ```json
//! {"hashes": ["w6uP8Tcg6K2QR905Rms8iXTlksL6OD1KOWBxTK7wxPI="]}
//! ```

use std::fmt;

use serde::de::{DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::HashBatchError;

/// One request entry: two arbitrary strings whose concatenation is hashed.
///
/// Older clients send the first field as `"srt_a"`; that spelling is
/// accepted as an alias of `"str_a"`. A missing or `null` field decodes as
/// the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// First field, hashed before [`Item::str_b`].
    #[serde(alias = "srt_a", deserialize_with = "null_as_empty")]
    pub str_a: String,
    /// Second field.
    #[serde(deserialize_with = "null_as_empty")]
    pub str_b: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Item {
    /// Create an item from its two fields.
    #[must_use]
    pub fn new(str_a: impl Into<String>, str_b: impl Into<String>) -> Self {
        Self {
            str_a: str_a.into(),
            str_b: str_b.into(),
        }
    }
}

/// Decoded request payload. Order is significant: output `i` belongs to item `i`.
pub type Batch = Vec<Item>;

/// Deserializes a JSON array by appending into an existing [`Batch`].
///
/// Unlike `Vec<Item>::deserialize`, this never allocates a new backing
/// vector, so a recycled batch keeps serving from its existing capacity.
/// A JSON `null` decodes to an empty batch, and a `null` element to an
/// empty [`Item`].
#[derive(Debug)]
pub struct BatchSeed<'a>(pub &'a mut Batch);

impl<'de> DeserializeSeed<'de> for BatchSeed<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for BatchSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of {\"str_a\", \"str_b\"} objects")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        if let Some(hint) = seq.size_hint() {
            self.0.reserve(hint);
        }
        while let Some(item) = seq.next_element::<Option<Item>>()? {
            self.0.push(item.unwrap_or_default());
        }
        Ok(())
    }
}

/// Decode `bytes` into `batch`, replacing whatever it held.
///
/// On failure the batch may hold a prefix of the payload's items; it is still
/// valid to recycle.
pub fn decode_batch(bytes: &[u8], batch: &mut Batch) -> Result<(), HashBatchError> {
    batch.clear();
    let mut de = serde_json::Deserializer::from_slice(bytes);
    BatchSeed(batch)
        .deserialize(&mut de)
        .map_err(HashBatchError::decode)?;
    de.end().map_err(HashBatchError::decode)
}

/// Successful response payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResponse {
    /// Base64-encoded SHA-256 digests, one per request item.
    pub hashes: Vec<String>,
}

/// Point-in-time counters of one object pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Entries currently idle in the pool.
    pub idle: usize,
    /// Maximum number of idle entries the pool retains.
    pub capacity: usize,
    /// Acquisitions served from an idle entry.
    pub hits: u64,
    /// Acquisitions that had to allocate.
    pub misses: u64,
    /// Releases that went back into the pool.
    pub returns: u64,
    /// Releases discarded because the pool was full.
    pub drops: u64,
}

impl PoolStats {
    /// Fraction of acquisitions served without allocating (0.0 to 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Always `"running"` while the server accepts requests.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Request body / response staging buffer pool.
    pub buffers: PoolStats,
    /// Decoded item batch pool.
    pub batches: PoolStats,
}
