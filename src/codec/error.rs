//! Codec error types
//!
//! Every failure here is a logic or data-integrity error raised synchronously
//! at the point of detection; nothing is transient, so there are no retries.
//! A window that simply misses the stored date range is not an error -- it is
//! a valid empty result.

use crate::codec::types::TimeStepUnit;
use thiserror::Error;

/// Errors that can occur while encoding, decoding, or fingerprinting blobs
#[derive(Error, Debug)]
pub enum CodecError {
    /// The unit/quantity pair violates the invariant that irregular series
    /// carry quantity 0 and regular series carry quantity >= 1
    #[error("time step quantity {quantity} is not valid for unit '{unit}'")]
    InvalidQuantity { unit: TimeStepUnit, quantity: u16 },

    /// Compression or decompression failed, including a decompressed length
    /// that does not match the expected raw length
    #[error("compression error: {0}")]
    Compression(String),

    /// A stored compression code that no provider recognizes
    #[error("unknown compression code: {0}")]
    UnknownCompressionCode(i32),

    /// A caller-supplied window whose end date precedes its start date
    #[error("invalid window: end date precedes start date")]
    InvalidWindow,

    /// An input array was empty where at least one element is required
    #[error("input array must contain at least one element")]
    EmptyInput,

    /// Caller-supplied metadata does not match the data being checksummed
    #[error("checksum metadata mismatch: {0}")]
    ChecksumMetadataMismatch(String),

    /// A regular-series operation was asked to handle an irregular record
    #[error("time series is not regular")]
    NotRegular,

    /// An irregular-series operation was asked to handle a regular record
    #[error("time series is not irregular")]
    NotIrregular,

    /// Stored bytes that violate the format's own consistency rules
    /// (record-width mismatch, unrepresentable stored timestamp, ...)
    #[error("corrupt blob: {0}")]
    Corruption(String),

    /// Calendar arithmetic left the representable date range
    #[error("date arithmetic outside the supported calendar range")]
    DateOutOfRange,
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
