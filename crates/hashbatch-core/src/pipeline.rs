//! Batch hashing pipeline.
//!
//! Each item hashes to `base64(sha256(str_a || str_b))` using the padded
//! standard alphabet. The two fields are concatenated without a separator,
//! so `("ab", "c")` and `("a", "bc")` produce the same digest.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use digest::Digest;
use sha2::Sha256;

use hashbatch_model::Item;

/// Length of a raw SHA-256 digest.
pub const DIGEST_LEN: usize = 32;

/// Length of a padded base64 encoding of [`DIGEST_LEN`] bytes.
pub const ENCODED_DIGEST_LEN: usize = 44;

/// Hash a single item.
#[must_use]
pub fn hash_item(item: &Item) -> String {
    let mut hasher = Sha256::new();
    let mut scratch = String::with_capacity(ENCODED_DIGEST_LEN);
    encode_item(&mut hasher, &mut scratch, item);
    scratch
}

/// Hash every item of `batch` in order, appending the results to `out`.
///
/// One hasher and one scratch string serve the whole batch; each pushed
/// result is its own allocation.
pub fn hash_batch(batch: &[Item], out: &mut Vec<String>) {
    out.reserve(batch.len());
    let mut hasher = Sha256::new();
    let mut scratch = String::with_capacity(ENCODED_DIGEST_LEN);
    for item in batch {
        encode_item(&mut hasher, &mut scratch, item);
        out.push(scratch.as_str().to_owned());
    }
}

/// Hash `item` into `scratch`, leaving `hasher` reset for the next item.
fn encode_item(hasher: &mut Sha256, scratch: &mut String, item: &Item) {
    hasher.update(item.str_a.as_bytes());
    hasher.update(item.str_b.as_bytes());
    let digest = hasher.finalize_reset();
    scratch.clear();
    BASE64_STANDARD.encode_string(digest.as_slice(), scratch);
}
