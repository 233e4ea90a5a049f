//! Duration parsing and formatting.
//!
//! Converts between human-entered time strings (`SS`, `MM:SS`, `HH:MM:SS`)
//! and whole seconds, and renders seconds back as zero-padded `HH:MM:SS`.
//! Also holds the preset durations offered by the frontend.

mod error;

use chrono::{DateTime, Local};
use tracing::debug;

pub use error::DurationError;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;

// ============================================================================
// Parsing
// ============================================================================

/// Parses a duration string into whole seconds.
///
/// One segment is read as seconds, two as `MM:SS`, three as `HH:MM:SS`.
/// Segments are not range-checked (`1:90` is 150 seconds). Blank input and
/// any other segment count yield `Ok(0)`.
///
/// # Errors
///
/// Returns `DurationError::InvalidSegment` if a segment is not a
/// non-negative integer, and `DurationError::Overflow` if the total does
/// not fit into `u64`.
///
/// # Example
///
/// ```
/// use repeat_timer::duration::parse;
///
/// assert_eq!(parse("01:30").unwrap(), 90);
/// assert_eq!(parse("1:00:00").unwrap(), 3600);
/// assert!(parse("aa:bb").is_err());
/// ```
pub fn parse(text: &str) -> Result<u64, DurationError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    let parts: Vec<&str> = text.split(':').collect();
    let multipliers: &[u64] = match parts.len() {
        1 => &[1],
        2 => &[SECONDS_PER_MINUTE, 1],
        3 => &[SECONDS_PER_HOUR, SECONDS_PER_MINUTE, 1],
        _ => return Ok(0),
    };

    let mut total: u64 = 0;
    for (part, multiplier) in parts.iter().zip(multipliers) {
        let value = parse_segment(part)?;
        total = value
            .checked_mul(*multiplier)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| DurationError::Overflow(text.to_string()))?;
    }

    Ok(total)
}

/// Parses a duration string, treating invalid input as zero seconds.
///
/// This is the lenient form used for free-text entry where a bad value
/// simply leaves the timer without a duration.
#[must_use]
pub fn parse_or_zero(text: &str) -> u64 {
    parse(text).unwrap_or_else(|e| {
        debug!("Ignoring invalid duration input {:?}: {}", text, e);
        0
    })
}

fn parse_segment(segment: &str) -> Result<u64, DurationError> {
    let segment = segment.trim();
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DurationError::InvalidSegment(segment.to_string()));
    }
    segment
        .parse::<u64>()
        .map_err(|_| DurationError::Overflow(segment.to_string()))
}

// ============================================================================
// Formatting
// ============================================================================

/// Formats whole seconds as `HH:MM:SS`.
///
/// Negative input is clamped to zero. Hours grow beyond two digits once the
/// duration reaches 100 hours.
#[must_use]
pub fn format(seconds: i64) -> String {
    let total = seconds.max(0).unsigned_abs();
    let hours = total / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = total % SECONDS_PER_MINUTE;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Formats an unsigned number of seconds as `HH:MM:SS`.
#[must_use]
pub fn format_u64(seconds: u64) -> String {
    format(i64::try_from(seconds).unwrap_or(i64::MAX))
}

/// Formats fractional seconds as `HH:MM:SS`, flooring to the whole second.
///
/// NaN, infinities and negative values render as `00:00:00`.
#[must_use]
pub fn format_secs_f64(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return format(0);
    }
    // `as` saturates for values beyond i64::MAX
    format(seconds.floor() as i64)
}

/// Formats a wall-clock instant as a 12-hour label, e.g. `1:05:09 PM`.
#[must_use]
pub fn format_clock(instant: &DateTime<Local>) -> String {
    instant.format("%-I:%M:%S %p").to_string()
}

// ============================================================================
// Presets
// ============================================================================

/// A preset duration offered next to free-text entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Display label
    pub label: &'static str,
    /// Duration in seconds
    pub seconds: u64,
}

/// Preset durations, shortest first.
pub const PRESETS: &[Preset] = &[
    Preset { label: "3 sec", seconds: 3 },
    Preset { label: "1 min", seconds: 60 },
    Preset { label: "1.5 min", seconds: 90 },
    Preset { label: "5 min", seconds: 5 * 60 },
    Preset { label: "7.5 min", seconds: 7 * 60 + 30 },
    Preset { label: "10 min", seconds: 10 * 60 },
    Preset { label: "15 min", seconds: 15 * 60 },
    Preset { label: "20 min", seconds: 20 * 60 },
    Preset { label: "25 min", seconds: 25 * 60 },
    Preset { label: "30 min", seconds: 30 * 60 },
    Preset { label: "45 min", seconds: 45 * 60 },
    Preset { label: "50 min", seconds: 50 * 60 },
    Preset { label: "60 min", seconds: 60 * 60 },
    Preset { label: "90 min", seconds: 90 * 60 },
];

/// Looks up a preset by label, ignoring case and whitespace
/// (`"1.5min"` matches `"1.5 min"`).
#[must_use]
pub fn preset(name: &str) -> Option<&'static Preset> {
    let wanted = normalize_label(name);
    PRESETS.iter().find(|p| normalize_label(p.label) == wanted)
}

fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolves user input that is either a preset label or a duration string.
///
/// # Errors
///
/// Returns the parse error if the input is neither a preset nor a valid
/// duration.
pub fn resolve(input: &str) -> Result<u64, DurationError> {
    match preset(input) {
        Some(p) => Ok(p.seconds),
        None => parse(input),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_hours_minutes_seconds() {
            assert_eq!(parse("01:02:03").unwrap(), 3723);
            assert_eq!(parse("10:00:00").unwrap(), 36000);
        }

        #[test]
        fn test_parse_minutes_seconds() {
            assert_eq!(parse("05:30").unwrap(), 330);
            assert_eq!(parse("0:03").unwrap(), 3);
        }

        #[test]
        fn test_parse_seconds_only() {
            assert_eq!(parse("45").unwrap(), 45);
        }

        #[test]
        fn test_parse_unbounded_segments() {
            assert_eq!(parse("1:90").unwrap(), 150);
        }

        #[test]
        fn test_parse_trims_whitespace() {
            assert_eq!(parse("  00 : 01 : 00 ").unwrap(), 60);
        }

        #[test]
        fn test_parse_blank_is_zero() {
            assert_eq!(parse("").unwrap(), 0);
            assert_eq!(parse("   ").unwrap(), 0);
        }

        #[test]
        fn test_parse_too_many_parts_is_zero() {
            assert_eq!(parse("1:2:3:4").unwrap(), 0);
        }

        #[test]
        fn test_parse_non_numeric_segment() {
            let err = parse("aa:10").unwrap_err();
            assert_eq!(err, DurationError::InvalidSegment("aa".to_string()));
        }

        #[test]
        fn test_parse_negative_segment() {
            assert!(parse("-1:00").unwrap_err().is_invalid_segment());
        }

        #[test]
        fn test_parse_empty_segment() {
            assert!(parse("10:").unwrap_err().is_invalid_segment());
        }

        #[test]
        fn test_parse_overflow() {
            let err = parse("99999999999999999999:00:00").unwrap_err();
            assert!(matches!(err, DurationError::Overflow(_)));

            let err = parse(&format!("{}:00:00", u64::MAX / 60)).unwrap_err();
            assert!(matches!(err, DurationError::Overflow(_)));
        }

        #[test]
        fn test_parse_or_zero() {
            assert_eq!(parse_or_zero("00:00:10"), 10);
            assert_eq!(parse_or_zero("abc"), 0);
        }
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_zero_padded() {
            assert_eq!(format(0), "00:00:00");
            assert_eq!(format(5), "00:00:05");
            assert_eq!(format(90), "00:01:30");
            assert_eq!(format(3723), "01:02:03");
        }

        #[test]
        fn test_format_negative_clamped() {
            assert_eq!(format(-1), "00:00:00");
            assert_eq!(format(i64::MIN), "00:00:00");
        }

        #[test]
        fn test_format_large_hours() {
            assert_eq!(format(100 * 3600), "100:00:00");
        }

        #[test]
        fn test_format_u64() {
            assert_eq!(format_u64(61), "00:01:01");
            assert_eq!(format_u64(u64::MAX), format(i64::MAX));
        }

        #[test]
        fn test_format_pattern() {
            for s in [0_i64, 1, 59, 60, 599, 3599, 3600, 86399] {
                let text = format(s);
                let bytes = text.as_bytes();
                assert_eq!(bytes.len(), 8, "{}", text);
                assert_eq!(bytes[2], b':');
                assert_eq!(bytes[5], b':');
                assert!(text.chars().filter(|c| *c != ':').all(|c| c.is_ascii_digit()));
            }
        }

        #[test]
        fn test_format_secs_f64_floors() {
            assert_eq!(format_secs_f64(59.9), "00:00:59");
            assert_eq!(format_secs_f64(-3.2), "00:00:00");
            assert_eq!(format_secs_f64(f64::NAN), "00:00:00");
        }

        #[test]
        fn test_round_trip() {
            for s in (0..=7200_u64).step_by(7).chain([86399, 359_999, 1_000_000]) {
                assert_eq!(parse(&format(s as i64)).unwrap(), s);
            }
        }

        #[test]
        fn test_format_clock() {
            use chrono::TimeZone;

            let afternoon = Local.with_ymd_and_hms(2024, 1, 15, 13, 5, 9).unwrap();
            assert_eq!(format_clock(&afternoon), "1:05:09 PM");

            let midnight = Local.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
            assert_eq!(format_clock(&midnight), "12:00:00 AM");
        }
    }

    mod preset_tests {
        use super::*;

        #[test]
        fn test_presets_sorted() {
            assert!(PRESETS.windows(2).all(|w| w[0].seconds < w[1].seconds));
        }

        #[test]
        fn test_preset_lookup() {
            assert_eq!(preset("3 sec").unwrap().seconds, 3);
            assert_eq!(preset("1.5MIN").unwrap().seconds, 90);
            assert_eq!(preset("7.5 min").unwrap().seconds, 450);
            assert!(preset("2 min").is_none());
        }

        #[test]
        fn test_resolve() {
            assert_eq!(resolve("25 min").unwrap(), 1500);
            assert_eq!(resolve("00:00:42").unwrap(), 42);
            assert!(resolve("soon").is_err());
        }
    }
}
