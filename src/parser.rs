//! Activity line parsing
//!
//! Every record is a single comma separated line. Training lines carry
//! `steps,activity,duration` and day lines carry `steps,duration`. Fields
//! are trimmed before they are decoded, so `"1000, Running, 0h30m"` is
//! accepted.
//!
//! Durations use the common `<number><unit>` sequence syntax (`1h30m`,
//! `45m`, `1.5h`, `90s`, `250ms`), which also covers the `XhYm` form the
//! activity logs are written in.

use std::time::Duration;

use tracing::debug;

use crate::error::ParseError;
use crate::models::{ActivityKind, ActivityRecord, DayRecord};

/// Number of fields in a `steps,activity,duration` line
pub const TRAINING_FIELDS: usize = 3;

/// Number of fields in a `steps,duration` line
pub const DAY_FIELDS: usize = 2;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Parse a `steps,activity,duration` line.
///
/// An unrecognised activity label is not an error at this stage; it is
/// returned as [`ActivityKind::Unknown`] and rejected by the report layer.
pub fn parse_training_record(line: &str) -> Result<ActivityRecord, ParseError> {
    let fields = split_fields(line, TRAINING_FIELDS)?;

    let steps = parse_steps(fields[0])?;
    let kind = ActivityKind::from_label(fields[1]);
    let duration = parse_duration(fields[2])?;

    debug!(steps, kind = %kind, duration = ?duration, "Parsed training record");

    Ok(ActivityRecord {
        steps,
        kind,
        duration,
    })
}

/// Parse a `steps,duration` line
pub fn parse_day_record(line: &str) -> Result<DayRecord, ParseError> {
    let fields = split_fields(line, DAY_FIELDS)?;

    let steps = parse_steps(fields[0])?;
    let duration = parse_duration(fields[1])?;

    debug!(steps, duration = ?duration, "Parsed day record");

    Ok(DayRecord { steps, duration })
}

/// Split a line on commas into exactly `expected` trimmed fields
pub fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    if fields.len() != expected {
        return Err(ParseError::MalformedInput {
            expected,
            found: fields.len(),
        });
    }

    Ok(fields)
}

/// Decode a step count, rejecting anything that is not a positive integer
pub fn parse_steps(field: &str) -> Result<u32, ParseError> {
    let value: i64 = field.parse().map_err(|e: std::num::ParseIntError| {
        ParseError::InvalidNumber {
            value: field.to_string(),
            reason: e.to_string(),
        }
    })?;

    if value <= 0 {
        return Err(ParseError::NonPositiveSteps { steps: value });
    }

    u32::try_from(value).map_err(|_| ParseError::InvalidNumber {
        value: field.to_string(),
        reason: "step count is too large".to_string(),
    })
}

/// Parse a duration expression such as `1h30m`, `0h45m`, `1.5h` or `90s`.
///
/// Accepted units are `ns`, `us` (`µs`, `μs`), `ms`, `s`, `m` and `h`. A
/// leading sign is allowed and the bare string `0` is zero. A negative
/// sign is only accepted when the span itself is zero (`-0`, `-0h0m`).
pub fn parse_duration(field: &str) -> Result<Duration, ParseError> {
    let value = field.trim();

    let (negative, mut rest) = match value.strip_prefix('-') {
        Some(unsigned) => (true, unsigned),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid_duration(value, "duration is empty"));
    }

    let mut total_nanos: u128 = 0;

    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(tail) => {
                let frac_len = tail.bytes().take_while(u8::is_ascii_digit).count();
                tail.split_at(frac_len)
            }
            None => ("", after_int),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid_duration(value, "expected a number"));
        }

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, tail) = after_number.split_at(unit_len);

        if unit.is_empty() {
            return Err(invalid_duration(value, "missing unit"));
        }

        let scale = unit_nanos(unit)
            .ok_or_else(|| invalid_duration(value, &format!("unknown unit {:?}", unit)))?;

        total_nanos = total_nanos
            .checked_add(component_nanos(int_part, frac_part, scale).ok_or_else(|| {
                invalid_duration(value, "duration is out of range")
            })?)
            .ok_or_else(|| invalid_duration(value, "duration is out of range"))?;

        rest = tail;
    }

    if negative && total_nanos > 0 {
        return Err(invalid_duration(value, "duration must not be negative"));
    }

    let secs = u64::try_from(total_nanos / NANOS_PER_SECOND)
        .map_err(|_| invalid_duration(value, "duration is out of range"))?;
    let nanos = (total_nanos % NANOS_PER_SECOND) as u32;

    Ok(Duration::new(secs, nanos))
}

/// Nanoseconds in one `unit`
fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SECOND,
        "m" => 60 * NANOS_PER_SECOND,
        "h" => 3_600 * NANOS_PER_SECOND,
        _ => return None,
    };
    Some(nanos)
}

/// Nanoseconds for one `<int>.<frac><unit>` group.
///
/// Fraction digits past nanosecond precision are dropped.
fn component_nanos(int_part: &str, frac_part: &str, scale: u128) -> Option<u128> {
    let whole: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };
    let mut nanos = whole.checked_mul(scale)?;

    if !frac_part.is_empty() {
        let digits = &frac_part[..frac_part.len().min(18)];
        let numerator: u128 = digits.parse().ok()?;
        let denominator = 10u128.pow(digits.len() as u32);
        nanos = nanos.checked_add(numerator * scale / denominator)?;
    }

    Some(nanos)
}

fn invalid_duration(value: &str, reason: &str) -> ParseError {
    ParseError::InvalidDuration {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_training_record() {
        let record = parse_training_record("1000,Running,0h30m").unwrap();

        assert_eq!(record.steps, 1000);
        assert_eq!(record.kind, ActivityKind::Running);
        assert_eq!(record.duration, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_parse_training_record_trims_fields() {
        let record = parse_training_record(" 2500 , walking ,1h5m ").unwrap();

        assert_eq!(record.steps, 2500);
        assert_eq!(record.kind, ActivityKind::Walking);
        assert_eq!(record.duration, Duration::from_secs(65 * 60));
    }

    #[test]
    fn test_unknown_label_is_not_a_parse_error() {
        let record = parse_training_record("1000,Swimming,0h30m").unwrap();
        assert_eq!(record.kind, ActivityKind::Unknown("Swimming".to_string()));
    }

    #[test]
    fn test_non_integer_steps() {
        let err = parse_training_record("abc,Running,0h30m").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { ref value, .. } if value == "abc"));
        assert!(err.is_invalid_number());
    }

    #[test]
    fn test_non_positive_steps() {
        assert_eq!(
            parse_day_record("0,30m").unwrap_err(),
            ParseError::NonPositiveSteps { steps: 0 }
        );
        assert_eq!(
            parse_training_record("-15,Walking,1h").unwrap_err(),
            ParseError::NonPositiveSteps { steps: -15 }
        );
    }

    #[test]
    fn test_step_count_overflow() {
        let err = parse_steps("99999999999").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn test_field_count_mismatch() {
        assert_eq!(
            parse_training_record("1000,0h30m").unwrap_err(),
            ParseError::MalformedInput {
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            parse_day_record("1000,Walking,30m").unwrap_err(),
            ParseError::MalformedInput {
                expected: 2,
                found: 3
            }
        );
        assert!(matches!(
            parse_day_record("").unwrap_err(),
            ParseError::MalformedInput { found: 1, .. }
        ));
    }

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration("0h30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("45m").unwrap(), Duration::from_secs(2700));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("3µs").unwrap(), Duration::from_micros(3));
        assert_eq!(parse_duration("1h0m0.5s").unwrap(), Duration::from_millis(3_600_500));
        assert_eq!(parse_duration("+10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration(".5m").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_duration_zero() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0h0m").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-0h0m").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        for input in ["", "30", "abc", "1x", "h", "-1h", "-", "-0h1s", "1h30", ".h", "1..5h"] {
            let err = parse_duration(input).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidDuration { .. }),
                "expected InvalidDuration for {:?}, got {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        let err = parse_duration("99999999999999999999999999999999h").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDuration { .. }));
    }
}
