//! Encoding of the persisted record set.
//!
//! The blob is a JSON envelope holding a format number, the hex SHA-256 of
//! the serialized record array, and the records themselves. The checksum
//! catches truncated or hand-mangled files that still happen to parse.

use crate::record::MaterialRecord;
use matprice_core::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};

/// Current envelope format. There is no migration path between formats.
pub const SNAPSHOT_FORMAT: u32 = 1;

/// The record array is kept as raw JSON so the checksum covers the exact
/// bytes written, never a re-serialization of parsed floats.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    format: u32,
    checksum: String,
    records: Box<RawValue>,
}

fn checksum(records_json: &str) -> String {
    hex::encode(Sha256::digest(records_json.as_bytes()))
}

/// Serialize records into a blob.
pub fn encode(records: &[MaterialRecord]) -> Result<Vec<u8>> {
    let records = serde_json::value::to_raw_value(records)?;
    let snapshot = Snapshot {
        format: SNAPSHOT_FORMAT,
        checksum: checksum(records.get()),
        records,
    };
    Ok(serde_json::to_vec(&snapshot)?)
}

/// Parse and verify a blob.
pub fn decode(bytes: &[u8]) -> Result<Vec<MaterialRecord>> {
    let snapshot: Snapshot = serde_json::from_slice(bytes).map_err(corrupt)?;

    if snapshot.format != SNAPSHOT_FORMAT {
        return Err(Error::new(
            ErrorCode::SnapshotCorrupt,
            format!(
                "Snapshot format {} is not supported (expected {SNAPSHOT_FORMAT})",
                snapshot.format
            ),
        ));
    }

    if checksum(snapshot.records.get()) != snapshot.checksum {
        return Err(Error::new(
            ErrorCode::ChecksumMismatch,
            "Snapshot checksum does not match its records",
        ));
    }

    serde_json::from_str(snapshot.records.get()).map_err(corrupt)
}

fn corrupt(err: serde_json::Error) -> Error {
    Error::new(ErrorCode::SnapshotCorrupt, format!("Unreadable snapshot: {err}")).with_source(err)
}
