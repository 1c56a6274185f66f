use serde::Serialize;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Hashes serializable data into an i64 via CBOR and XxHash64 with seed 0.
///
/// The CBOR encoding is deterministic, so the result is stable across runs
/// and hosts and can be stored in indexed columns.
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, String> {
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&cbor);
    Ok(hasher.finish() as i64)
}
