//! Time-series blob codec
//!
//! This module turns arrays of time series values into compact compressed
//! byte blobs and back, with partial-range ("windowed") extraction and
//! two-level change-detection fingerprints:
//!
//! - **types**: core data model (TimeStepUnit, TimePoint, Trace, SeriesRecord)
//! - **calendar**: step arithmetic on regular time grids, including
//!   variable-length month/year steps
//! - **blob**: value-array and date/value-pair encoding with windowed decode
//! - **compression**: versioned compressor dispatched on a stored code
//! - **checksum**: per-trace and aggregate series fingerprints
//! - **trace**: end-to-end trace encoding with change detection
//! - **error**: error types
//!
//! # Architecture
//!
//! ```text
//! Write path:
//!   values -> encode -> trace checksum --(unchanged? stop)--> compress -> store
//!
//! Read path:
//!   stored blob -> decompress (stored code, expected length) -> decode (window)
//! ```
//!
//! Every operation is a pure function over its arguments: no shared state,
//! no I/O, safe to call concurrently for distinct traces. The only ordering
//! requirement is that the series checksum needs all per-trace checksums
//! before it can aggregate them.

pub mod blob;
pub mod calendar;
pub mod checksum;
pub mod compression;
pub mod error;
pub mod trace;
pub mod types;

// Re-export commonly used items
pub use blob::{
    decode_points, decode_values, encode_points, encode_values, IRREGULAR_RECORD_WIDTH,
    REGULAR_RECORD_WIDTH,
};
pub use calendar::{
    count_steps, decode_timestamp, encode_timestamp, fill_date_array, increment_date,
    TIMESTAMP_WIDTH,
};
pub use checksum::{
    record_checksum, series_checksum, trace_checksum, SERIES_CHECKSUM_WIDTH,
    TRACE_CHECKSUM_WIDTH,
};
pub use compression::{compress, decompress, CompressionCode};
pub use error::{CodecError, CodecResult};
pub use trace::{encode_irregular_trace, encode_regular_trace};
pub use types::{DecodeWindow, SeriesRecord, TimePoint, TimeStepUnit, Trace};
