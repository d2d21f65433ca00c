//! Blob encoding and windowed decoding of time series values
//!
//! Two record shapes share this module:
//!
//! - **Regular** series store only values: `N` consecutive little-endian
//!   8-byte IEEE-754 doubles. No timestamps are stored; the step dates are
//!   reconstructed from the series' start date, unit, and quantity.
//! - **Irregular** series store date/value pairs: `N` consecutive 16-byte
//!   entries, each an 8-byte calendar timestamp followed by an 8-byte double,
//!   pre-sorted ascending by timestamp.
//!
//! Decoding can be restricted to a [`DecodeWindow`]. A window that misses the
//! stored range entirely yields an empty result, not an error, and an output
//! cap smaller than the available data truncates rather than fails.

use crate::codec::calendar::{
    count_steps, decode_timestamp, encode_timestamp, increment_date, TIMESTAMP_WIDTH,
};
use crate::codec::error::{CodecError, CodecResult};
use crate::codec::types::{DecodeWindow, TimePoint, TimeStepUnit};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Bytes per stored value of a regular series.
pub const REGULAR_RECORD_WIDTH: usize = 8;

/// Bytes per stored date/value entry of an irregular series.
pub const IRREGULAR_RECORD_WIDTH: usize = TIMESTAMP_WIDTH + 8;

/// Encode a regular series' values as a raw (uncompressed) blob.
pub fn encode_values(values: &[f64]) -> CodecResult<Vec<u8>> {
    if values.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let mut blob = Vec::with_capacity(values.len() * REGULAR_RECORD_WIDTH);
    for value in values {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    Ok(blob)
}

/// Encode an irregular series' date/value pairs as a raw blob.
///
/// The input must already be sorted ascending by date; the windowed decoder
/// relies on that ordering to stop scanning early.
pub fn encode_points(points: &[TimePoint]) -> CodecResult<Vec<u8>> {
    if points.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let mut blob = Vec::with_capacity(points.len() * IRREGULAR_RECORD_WIDTH);
    for point in points {
        blob.extend_from_slice(&encode_timestamp(point.date).to_le_bytes());
        blob.extend_from_slice(&point.value.to_le_bytes());
    }
    Ok(blob)
}

fn read_f64(chunk: &[u8]) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(chunk);
    f64::from_le_bytes(buf)
}

fn read_i64(chunk: &[u8]) -> i64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(chunk);
    i64::from_le_bytes(buf)
}

/// Decode a regular series blob, optionally restricted to a window.
///
/// The window arithmetic runs entirely on the calendar grid: values to skip
/// at the front and truncate at the back are counted with [`count_steps`],
/// then `min(remaining, max_count)` values are copied starting at the skip
/// offset. A window that leaves nothing to read returns an empty vector
/// without touching the buffer.
pub fn decode_values(
    blob: &[u8],
    blob_start: DateTime<Utc>,
    unit: TimeStepUnit,
    quantity: u16,
    window: Option<&DecodeWindow>,
) -> CodecResult<Vec<f64>> {
    if unit.is_irregular() {
        return Err(CodecError::NotRegular);
    }
    if blob.len() % REGULAR_RECORD_WIDTH != 0 {
        return Err(CodecError::Corruption(format!(
            "regular blob length {} is not a multiple of the record width {}",
            blob.len(),
            REGULAR_RECORD_WIDTH
        )));
    }

    let stored = (blob.len() / REGULAR_RECORD_WIDTH) as i64;
    if stored == 0 {
        return Ok(Vec::new());
    }

    let (skip, read_count) = match window {
        None => (0, stored),
        Some(w) => {
            w.validate()?;

            let skip = if w.start > blob_start {
                count_steps(blob_start, w.start, unit, quantity)?
            } else {
                0
            };

            let blob_end = increment_date(blob_start, unit, quantity, stored - 1)?;
            let truncate = if w.end < blob_end {
                count_steps(w.end, blob_end, unit, quantity)?
            } else {
                0
            };

            let cap = i64::try_from(w.max_count).unwrap_or(i64::MAX);
            let read = (stored - skip - truncate).min(cap);
            (skip, read)
        }
    };

    if read_count <= 0 {
        debug!(stored, skip, "window leaves no regular values to read");
        return Ok(Vec::new());
    }

    let offset = skip as usize * REGULAR_RECORD_WIDTH;
    let values = blob[offset..]
        .chunks_exact(REGULAR_RECORD_WIDTH)
        .take(read_count as usize)
        .map(read_f64)
        .collect();
    Ok(values)
}

/// Decode an irregular series blob, optionally restricted to a window.
///
/// Entries are scanned in stored (ascending) order: entries before the window
/// are skipped, the scan stops at the first entry past the window or once
/// `max_count` entries have been emitted. A window that does not overlap the
/// stored `[first, last]` range at all returns empty before any scan.
pub fn decode_points(blob: &[u8], window: Option<&DecodeWindow>) -> CodecResult<Vec<TimePoint>> {
    if blob.len() % IRREGULAR_RECORD_WIDTH != 0 {
        return Err(CodecError::Corruption(format!(
            "irregular blob length {} is not a multiple of the record width {}",
            blob.len(),
            IRREGULAR_RECORD_WIDTH
        )));
    }

    if blob.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(w) = window {
        w.validate()?;

        // cheap bounds check on the first and last entries before scanning
        let blob_start = decode_timestamp(read_i64(&blob[..TIMESTAMP_WIDTH]))?;
        let last_entry = blob.len() - IRREGULAR_RECORD_WIDTH;
        let blob_end =
            decode_timestamp(read_i64(&blob[last_entry..last_entry + TIMESTAMP_WIDTH]))?;
        if w.end < blob_start || w.start > blob_end {
            debug!("window does not overlap the stored irregular range");
            return Ok(Vec::new());
        }
    }

    let mut points = Vec::new();
    for entry in blob.chunks_exact(IRREGULAR_RECORD_WIDTH) {
        let date = decode_timestamp(read_i64(&entry[..TIMESTAMP_WIDTH]))?;
        if let Some(w) = window {
            if date < w.start {
                continue;
            }
            if date > w.end {
                break;
            }
        }

        points.push(TimePoint {
            date,
            value: read_f64(&entry[TIMESTAMP_WIDTH..]),
        });

        if let Some(w) = window {
            if points.len() >= w.max_count {
                break;
            }
        }
    }

    Ok(points)
}
