//! Write-path helpers: encode a trace end-to-end with change detection
//!
//! A trace rewrite re-encodes the caller's values and fingerprints the
//! uncompressed bytes first. When the fingerprint equals the stored one the
//! rewrite is an idempotent no-op: compression and the store write are both
//! skipped, and the caller keeps the stored blob and the series checksum it
//! already has. Only a changed fingerprint pays for compression and obliges
//! the caller to persist the new trace and recompute the series checksum.

use crate::codec::blob::{encode_points, encode_values, REGULAR_RECORD_WIDTH};
use crate::codec::calendar::increment_date;
use crate::codec::checksum::trace_checksum;
use crate::codec::compression::{compress, CompressionCode};
use crate::codec::error::{CodecError, CodecResult};
use crate::codec::types::{TimePoint, TimeStepUnit, Trace};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Encode, fingerprint, and compress one trace of a regular series.
///
/// Returns `Ok(None)` when the new fingerprint equals `stored_checksum`,
/// meaning nothing needs to be written. The trace's `end_date` is derived
/// from the start date and the value count on the series' calendar grid.
pub fn encode_regular_trace(
    trace_number: i32,
    values: &[f64],
    start_date: DateTime<Utc>,
    unit: TimeStepUnit,
    quantity: u16,
    code: CompressionCode,
    stored_checksum: Option<[u8; 8]>,
) -> CodecResult<Option<Trace>> {
    if unit.is_irregular() {
        return Err(CodecError::NotRegular);
    }

    let blob = encode_values(values)?;
    debug_assert_eq!(blob.len(), values.len() * REGULAR_RECORD_WIDTH);
    let checksum = trace_checksum(trace_number, &blob);

    if stored_checksum == Some(checksum) {
        debug!(trace_number, "trace fingerprint unchanged, skipping rewrite");
        return Ok(None);
    }

    let end_date = increment_date(start_date, unit, quantity, values.len() as i64 - 1)?;
    let compressed_blob = compress(&blob, code)?;

    Ok(Some(Trace {
        trace_number,
        step_count: values.len() as i32,
        end_date,
        compressed_blob,
        checksum,
    }))
}

/// Encode, fingerprint, and compress one trace of an irregular series.
///
/// The points must be sorted ascending by date; the trace's `end_date` is
/// the date of the last point.
pub fn encode_irregular_trace(
    trace_number: i32,
    points: &[TimePoint],
    code: CompressionCode,
    stored_checksum: Option<[u8; 8]>,
) -> CodecResult<Option<Trace>> {
    let last = points.last().ok_or(CodecError::EmptyInput)?;

    let blob = encode_points(points)?;
    let checksum = trace_checksum(trace_number, &blob);

    if stored_checksum == Some(checksum) {
        debug!(trace_number, "trace fingerprint unchanged, skipping rewrite");
        return Ok(None);
    }

    let compressed_blob = compress(&blob, code)?;

    Ok(Some(Trace {
        trace_number,
        step_count: points.len() as i32,
        end_date: last.date,
        compressed_blob,
        checksum,
    }))
}
