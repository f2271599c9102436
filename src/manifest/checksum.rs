//! CRC32 checksums for snapshot payloads
//!
//! Checksums are taken over the canonical JSON of a snapshot: the snapshot is
//! first converted to a `serde_json::Value`, whose object keys are sorted, so
//! hash maps checksum the same regardless of iteration order.
//!
//! Uses CRC32 (IEEE polynomial) via crc32fast.

use crc32fast::Hasher;
use serde::Serialize;

use super::errors::{ManifestError, ManifestResult};

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Computes the checksum of a snapshot's canonical JSON form.
pub fn snapshot_checksum<S: Serialize>(snapshot: &S) -> ManifestResult<u32> {
    let value = serde_json::to_value(snapshot).map_err(ManifestError::Serialize)?;
    let bytes = serde_json::to_vec(&value).map_err(ManifestError::Serialize)?;
    Ok(compute_checksum(&bytes))
}

/// Formats a checksum as `crc32:xxxxxxxx` (lowercase hex, zero-padded).
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Parses a `crc32:xxxxxxxx` string back to u32.
pub fn parse_checksum(formatted: &str) -> Option<u32> {
    let stripped = formatted.strip_prefix("crc32:")?;
    u32::from_str_radix(stripped, 16).ok()
}
