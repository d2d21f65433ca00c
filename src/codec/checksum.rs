//! Two-level fingerprints for change detection and integrity verification
//!
//! The per-trace checksum is a fast 64-bit XXH3 hash over the trace number
//! and the **uncompressed** record bytes, so it stays stable across
//! compression-algorithm upgrades. The series checksum is a stronger 128-bit
//! BLAKE3 digest (truncated to 16 bytes) over the series' calendar metadata
//! and the per-trace checksums in ascending trace-number order. Order
//! independence of the input is achieved by that explicit sort, not by any
//! commutativity of the hash.

use crate::codec::calendar::encode_timestamp;
use crate::codec::error::{CodecError, CodecResult};
use crate::codec::types::{SeriesRecord, TimeStepUnit, Trace};
use chrono::{DateTime, Utc};
use xxhash_rust::xxh3::Xxh3;

/// Width in bytes of a trace checksum.
pub const TRACE_CHECKSUM_WIDTH: usize = 8;

/// Width in bytes of a series checksum.
pub const SERIES_CHECKSUM_WIDTH: usize = 16;

/// Compute the fingerprint of one trace from its number and its decoded
/// (uncompressed) blob bytes.
pub fn trace_checksum(trace_number: i32, decoded_blob: &[u8]) -> [u8; TRACE_CHECKSUM_WIDTH] {
    let mut hasher = Xxh3::new();
    hasher.update(&trace_number.to_le_bytes());
    hasher.update(decoded_blob);
    hasher.digest().to_le_bytes()
}

/// Compute the aggregate fingerprint of a series from its calendar metadata
/// and the per-trace checksums.
///
/// The digest covers `unit` (2 bytes LE), `quantity` (2 bytes LE), the start
/// date's 8-byte calendar encoding, and the trace checksums concatenated in
/// ascending trace-number order; the caller's ordering does not matter.
/// An irregular unit with nonzero quantity is rejected before hashing:
/// silently correcting it would let two logically different series produce
/// the same checksum.
pub fn series_checksum(
    unit: TimeStepUnit,
    quantity: u16,
    start_date: DateTime<Utc>,
    traces: &[(i32, [u8; TRACE_CHECKSUM_WIDTH])],
) -> CodecResult<[u8; SERIES_CHECKSUM_WIDTH]> {
    unit.check_quantity(quantity)?;

    let mut ordered: Vec<&(i32, [u8; TRACE_CHECKSUM_WIDTH])> = traces.iter().collect();
    ordered.sort_by_key(|(number, _)| *number);

    let mut hasher = blake3::Hasher::new();
    hasher.update(&unit.code().to_le_bytes());
    hasher.update(&quantity.to_le_bytes());
    hasher.update(&encode_timestamp(start_date).to_le_bytes());
    for (_, checksum) in ordered {
        hasher.update(checksum);
    }

    let digest = hasher.finalize();
    let mut out = [0u8; SERIES_CHECKSUM_WIDTH];
    out.copy_from_slice(&digest.as_bytes()[..SERIES_CHECKSUM_WIDTH]);
    Ok(out)
}

/// Strict aggregate entry point: validate each trace's redundant metadata
/// against the record before computing the series checksum.
///
/// Every trace of an ensemble shares the record's step count and end date;
/// a disagreement means the caller is checksumming data that does not match
/// the metadata it supplied, which must fail loudly rather than produce a
/// plausible fingerprint.
pub fn record_checksum(
    record: &SeriesRecord,
    traces: &[Trace],
) -> CodecResult<[u8; SERIES_CHECKSUM_WIDTH]> {
    for trace in traces {
        if trace.step_count != record.step_count {
            return Err(CodecError::ChecksumMetadataMismatch(format!(
                "trace {} stores {} time steps but the record declares {}",
                trace.trace_number, trace.step_count, record.step_count
            )));
        }
        if trace.end_date != record.end_date {
            return Err(CodecError::ChecksumMetadataMismatch(format!(
                "trace {} ends at {} but the record declares {}",
                trace.trace_number, trace.end_date, record.end_date
            )));
        }
    }

    let pairs: Vec<(i32, [u8; TRACE_CHECKSUM_WIDTH])> = traces
        .iter()
        .map(|t| (t.trace_number, t.checksum))
        .collect();
    series_checksum(record.unit, record.quantity, record.start_date, &pairs)
}
