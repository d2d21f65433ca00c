//! Core data types for the tsblob codec
//!
//! This module defines the types shared by every part of the codec:
//! - `TimeStepUnit`: calendar unit of a regular time grid (or the irregular marker)
//! - `TimePoint`: one date/value pair of an irregular series
//! - `Trace`: one member of a series ensemble, with its compressed blob and fingerprint
//! - `SeriesRecord`: the stored metadata of a whole series
//! - `DecodeWindow`: a caller-requested sub-range for partial decoding

use crate::codec::error::{CodecError, CodecResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Calendar unit of a regular time step, or `Irregular` for series whose
/// steps fall at arbitrary explicit timestamps.
///
/// The discriminants are the stored unit codes and must never be renumbered:
/// historical records reference them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[repr(u16)]
pub enum TimeStepUnit {
    Irregular = 0,
    Minute = 1,
    Hour = 2,
    Day = 3,
    Week = 4,
    Month = 5,
    Year = 6,
}

impl TimeStepUnit {
    /// The stored unit code, as hashed into the series checksum.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether this is the irregular marker unit.
    pub fn is_irregular(self) -> bool {
        self == TimeStepUnit::Irregular
    }

    /// Whether a step can be computed with fixed-length arithmetic.
    /// Month and year steps vary with the calendar.
    pub fn is_fixed_length(self) -> bool {
        matches!(
            self,
            TimeStepUnit::Minute | TimeStepUnit::Hour | TimeStepUnit::Day | TimeStepUnit::Week
        )
    }

    /// Enforce the quantity invariant: irregular series carry quantity 0,
    /// regular series carry quantity >= 1.
    ///
    /// Violations are hard errors rather than silently-corrected values,
    /// because correction would let two logically different series hash to
    /// the same fingerprint.
    pub fn check_quantity(self, quantity: u16) -> CodecResult<()> {
        let ok = if self.is_irregular() {
            quantity == 0
        } else {
            quantity >= 1
        };
        if ok {
            Ok(())
        } else {
            Err(CodecError::InvalidQuantity {
                unit: self,
                quantity,
            })
        }
    }
}

impl TryFrom<u16> for TimeStepUnit {
    type Error = CodecError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TimeStepUnit::Irregular),
            1 => Ok(TimeStepUnit::Minute),
            2 => Ok(TimeStepUnit::Hour),
            3 => Ok(TimeStepUnit::Day),
            4 => Ok(TimeStepUnit::Week),
            5 => Ok(TimeStepUnit::Month),
            6 => Ok(TimeStepUnit::Year),
            _ => Err(CodecError::Corruption(format!(
                "unknown time step unit code: {}",
                code
            ))),
        }
    }
}

impl std::fmt::Display for TimeStepUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeStepUnit::Irregular => write!(f, "irregular"),
            TimeStepUnit::Minute => write!(f, "minute"),
            TimeStepUnit::Hour => write!(f, "hour"),
            TimeStepUnit::Day => write!(f, "day"),
            TimeStepUnit::Week => write!(f, "week"),
            TimeStepUnit::Month => write!(f, "month"),
            TimeStepUnit::Year => write!(f, "year"),
        }
    }
}

/// One date/value pair of an irregular time series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimePoint {
    /// Timestamp of the measurement
    pub date: DateTime<Utc>,
    /// The measured value
    pub value: f64,
}

impl TimePoint {
    pub fn new(date: DateTime<Utc>, value: f64) -> Self {
        Self { date, value }
    }
}

/// One member of a series ensemble.
///
/// `step_count` and `end_date` are redundant with the record-level values and
/// are kept per-trace so that a trace can be validated independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trace {
    /// Identifies the trace within its series; unique, but insertion order
    /// is not significant
    pub trace_number: i32,
    /// Number of time steps stored in the blob
    pub step_count: i32,
    /// Date of the last stored time step
    pub end_date: DateTime<Utc>,
    /// The compressed value blob
    pub compressed_blob: Vec<u8>,
    /// Fingerprint of (trace_number, uncompressed blob)
    pub checksum: [u8; 8],
}

/// Stored metadata of one time series and its ensemble of traces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesRecord {
    /// Unique identifier of the record in the backing store
    pub id: Uuid,
    /// Calendar unit of the time step
    pub unit: TimeStepUnit,
    /// Number of units per step; 0 iff `unit` is irregular
    pub quantity: u16,
    /// Date of the first stored time step
    pub start_date: DateTime<Utc>,
    /// Date of the last stored time step
    pub end_date: DateTime<Utc>,
    /// Number of stored time steps
    pub step_count: i32,
    /// Compression generation used for this record's blobs; immutable once
    /// the blobs are written
    pub compression_code: i32,
    /// Aggregate fingerprint over the ensemble
    pub checksum: [u8; 16],
}

/// A caller-requested date window for partial decoding.
///
/// Both bounds are inclusive. `max_count` caps the number of decoded items;
/// a cap smaller than the available data truncates the result, it is not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeWindow {
    /// First date to include
    pub start: DateTime<Utc>,
    /// Last date to include
    pub end: DateTime<Utc>,
    /// Maximum number of items to decode
    pub max_count: usize,
}

impl DecodeWindow {
    /// Create a window, rejecting one whose end precedes its start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, max_count: usize) -> CodecResult<Self> {
        let window = Self {
            start,
            end,
            max_count,
        };
        window.validate()?;
        Ok(window)
    }

    /// Re-check the bound ordering; decode entry points call this so that a
    /// hand-constructed window is rejected the same way.
    pub(crate) fn validate(&self) -> CodecResult<()> {
        if self.end < self.start {
            return Err(CodecError::InvalidWindow);
        }
        Ok(())
    }

    /// Check whether a date falls within this window.
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        date >= self.start && date <= self.end
    }
}
