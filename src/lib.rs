//! # tsblob
//!
//! Codec for persisting large numeric time series as compact binary blobs,
//! usable by ensemble ("trace") and single-series callers alike.
//!
//! ## Features
//!
//! - **Calendar step arithmetic**: six regular units from minutes to years,
//!   with correct end-of-month clamping for the variable-length ones
//! - **Windowed decoding**: extract a date sub-range without materializing
//!   the whole series
//! - **Versioned compression**: blobs record the generation that wrote them,
//!   so old data stays readable after algorithm upgrades
//! - **Two-level fingerprints**: a fast per-trace checksum for change
//!   detection plus a strong aggregate series checksum
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tsblob::{
//!     decode_values, decompress, encode_regular_trace, CompressionCode, DecodeWindow,
//!     TimeStepUnit, REGULAR_RECORD_WIDTH,
//! };
//!
//! fn main() -> Result<(), tsblob::CodecError> {
//!     let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//!     let values: Vec<f64> = (0..366).map(|i| i as f64).collect();
//!
//!     // Write path: encode, fingerprint, compress
//!     let trace = encode_regular_trace(
//!         1,
//!         &values,
//!         start,
//!         TimeStepUnit::Day,
//!         1,
//!         CompressionCode::default(),
//!         None,
//!     )?
//!     .expect("a trace is always produced when no checksum is stored");
//!
//!     // Read path: decompress on the stored code, decode a window
//!     let raw = decompress(
//!         &trace.compressed_blob,
//!         values.len() * REGULAR_RECORD_WIDTH,
//!         CompressionCode::default(),
//!     )?;
//!     let march = DecodeWindow::new(
//!         Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap(),
//!         Utc.with_ymd_and_hms(2020, 3, 31, 0, 0, 0).unwrap(),
//!         usize::MAX,
//!     )?;
//!     let decoded = decode_values(&raw, start, TimeStepUnit::Day, 1, Some(&march))?;
//!     assert_eq!(decoded.len(), 31);
//!
//!     Ok(())
//! }
//! ```

pub mod codec;

// Re-export the public surface at the crate root for convenience
pub use codec::{
    compress, count_steps, decode_points, decode_timestamp, decode_values, decompress,
    encode_irregular_trace, encode_points, encode_regular_trace, encode_timestamp, encode_values,
    fill_date_array, increment_date, record_checksum, series_checksum, trace_checksum, CodecError,
    CodecResult, CompressionCode, DecodeWindow, SeriesRecord, TimePoint, TimeStepUnit, Trace,
    IRREGULAR_RECORD_WIDTH, REGULAR_RECORD_WIDTH, SERIES_CHECKSUM_WIDTH, TIMESTAMP_WIDTH,
    TRACE_CHECKSUM_WIDTH,
};
