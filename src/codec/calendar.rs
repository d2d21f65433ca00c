//! Calendar step arithmetic for regular time grids
//!
//! Minute, hour, day, and week steps are fixed-length (a week is exactly
//! seven days). Month and year steps are calendar-variable: adding a month to
//! a date whose day-of-month exceeds the target month clamps to the target
//! month's last day, so Jan 31 + 1 month is Feb 28 (or Feb 29 in a leap
//! year). `Irregular` is a marker unit only; arithmetic on it is a no-op.
//!
//! Because month and year steps are non-uniform, `count_steps` for those
//! units is defined operationally: advance one step at a time from the
//! earlier date until the later date is reached or passed. The clamping
//! compounds (Jan 31 -> Feb 28 -> Mar 28), which no closed form reproduces.

use crate::codec::error::{CodecError, CodecResult};
use crate::codec::types::TimeStepUnit;
use chrono::{DateTime, Duration, Months, Utc};

/// Width in bytes of the binary calendar-timestamp encoding.
pub const TIMESTAMP_WIDTH: usize = 8;

/// Encode a date as the fixed 64-bit calendar representation used inside
/// blobs and checksums: signed microseconds since the Unix epoch.
pub fn encode_timestamp(date: DateTime<Utc>) -> i64 {
    date.timestamp_micros()
}

/// Decode the 64-bit calendar representation back to a date.
///
/// An unrepresentable stored value is a data-integrity failure, not a
/// recoverable input error.
pub fn decode_timestamp(micros: i64) -> CodecResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| {
        CodecError::Corruption(format!(
            "stored timestamp {} is outside the representable date range",
            micros
        ))
    })
}

/// Microseconds per single unit for the fixed-length units.
fn fixed_unit_micros(unit: TimeStepUnit) -> Option<i64> {
    const MICROS_PER_MINUTE: i64 = 60 * 1_000_000;
    match unit {
        TimeStepUnit::Minute => Some(MICROS_PER_MINUTE),
        TimeStepUnit::Hour => Some(60 * MICROS_PER_MINUTE),
        TimeStepUnit::Day => Some(24 * 60 * MICROS_PER_MINUTE),
        TimeStepUnit::Week => Some(7 * 24 * 60 * MICROS_PER_MINUTE),
        _ => None,
    }
}

/// Calendar-aware month offset with end-of-month clamping, in either
/// direction.
fn shift_months(date: DateTime<Utc>, months: i64) -> CodecResult<DateTime<Utc>> {
    let magnitude =
        u32::try_from(months.unsigned_abs()).map_err(|_| CodecError::DateOutOfRange)?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    };
    shifted.ok_or(CodecError::DateOutOfRange)
}

/// Add `quantity * steps` units to `start`.
///
/// Month and year addition is applied as one combined offset, so the
/// end-of-month clamp is applied once against the final target month.
/// Negative `steps` move backwards. `Irregular` returns `start` unchanged.
pub fn increment_date(
    start: DateTime<Utc>,
    unit: TimeStepUnit,
    quantity: u16,
    steps: i64,
) -> CodecResult<DateTime<Utc>> {
    if unit.is_irregular() {
        return Ok(start);
    }
    unit.check_quantity(quantity)?;

    let total_units = (quantity as i64)
        .checked_mul(steps)
        .ok_or(CodecError::DateOutOfRange)?;

    match unit {
        TimeStepUnit::Minute | TimeStepUnit::Hour | TimeStepUnit::Day | TimeStepUnit::Week => {
            let unit_micros = fixed_unit_micros(unit).ok_or(CodecError::DateOutOfRange)?;
            let offset = total_units
                .checked_mul(unit_micros)
                .ok_or(CodecError::DateOutOfRange)?;
            start
                .checked_add_signed(Duration::microseconds(offset))
                .ok_or(CodecError::DateOutOfRange)
        }
        TimeStepUnit::Month => shift_months(start, total_units),
        TimeStepUnit::Year => shift_months(
            start,
            total_units
                .checked_mul(12)
                .ok_or(CodecError::DateOutOfRange)?,
        ),
        TimeStepUnit::Irregular => Ok(start),
    }
}

/// Count the whole steps of size `quantity * unit` needed to advance from the
/// earlier of the two dates to reach or pass the later one.
///
/// The result is symmetric in its date arguments and never negative. For
/// fixed-length units this is a closed-form ceiling division; for month and
/// year units the steps are counted by iterating `increment_date` one step at
/// a time, so the cost is proportional to the answer.
pub fn count_steps(
    a: DateTime<Utc>,
    b: DateTime<Utc>,
    unit: TimeStepUnit,
    quantity: u16,
) -> CodecResult<i64> {
    if unit.is_irregular() {
        return Ok(0);
    }
    unit.check_quantity(quantity)?;

    let (earlier, later) = if b < a { (b, a) } else { (a, b) };

    if unit.is_fixed_length() {
        let unit_micros = fixed_unit_micros(unit).ok_or(CodecError::DateOutOfRange)?;
        let step_micros = unit_micros
            .checked_mul(quantity as i64)
            .ok_or(CodecError::DateOutOfRange)?;
        let span = (later - earlier)
            .num_microseconds()
            .ok_or(CodecError::DateOutOfRange)?;
        // ceiling division: partial steps count as a whole step
        return Ok((span + step_micros - 1) / step_micros);
    }

    let months_per_step = match unit {
        TimeStepUnit::Month => quantity as i64,
        TimeStepUnit::Year => quantity as i64 * 12,
        _ => unreachable!("fixed-length units handled above"),
    };

    let mut current = earlier;
    let mut steps = 0i64;
    while current < later {
        current = shift_months(current, months_per_step)?;
        steps += 1;
    }
    Ok(steps)
}

/// Produce the sequence of `count` step dates starting at `start`.
///
/// Each date is a single-step increment of the previous one, which for month
/// and year units is not the same as `start + i` steps near month ends.
pub fn fill_date_array(
    unit: TimeStepUnit,
    quantity: u16,
    count: usize,
    start: DateTime<Utc>,
) -> CodecResult<Vec<DateTime<Utc>>> {
    if count == 0 {
        return Err(CodecError::EmptyInput);
    }

    let mut dates = Vec::with_capacity(count);
    let mut current = start;
    dates.push(current);
    for _ in 1..count {
        current = increment_date(current, unit, quantity, 1)?;
        dates.push(current);
    }
    Ok(dates)
}
