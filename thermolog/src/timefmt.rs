//! Timestamp codec for the canonical `YYYY-MM-DD HH:MM:SS` representation.
//!
//! Every persisted timestamp goes through this module: flat-file lines and
//! the `reading.date` database column both store the canonical string, and
//! range queries rely on it ordering lexicographically the same way the
//! underlying instants order.
//!
//! The codec works at one-second resolution. Encoding truncates sub-second
//! components (it never rounds), and decoding is strict: exactly nineteen
//! characters, literal separators, all-digit fields within range. Both
//! directions use the local-time calendar, so for every whole-second
//! instant `t`, `string_to_time(&time_to_string(&t)?)? == t`, and for
//! every canonical string `s`, `time_to_string(&string_to_time(s)?)? == s`.

use chrono::{Datelike, Local, TimeZone, Timelike};

use crate::error::TimeError;
use crate::reading::ReadingTime;

/// Encodes an instant as `YYYY-MM-DD HH:MM:SS` in local time.
///
/// Sub-second components are discarded. The result is similar to SQL dates,
/// e.g. `"2020-05-25 13:37:00"`.
///
/// # Errors
///
/// Fails only when the year falls outside `0..=9999` and therefore cannot
/// be written in the fixed-width format.
pub fn time_to_string(time: &ReadingTime) -> Result<String, TimeError> {
    let year = time.year();
    if !(0..=9999).contains(&year) {
        return Err(TimeError::UnrepresentableYear { year });
    }
    Ok(format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    ))
}

/// Decodes a canonical `YYYY-MM-DD HH:MM:SS` string into a local-time
/// instant.
///
/// # Errors
///
/// The parse is strict. Input of the wrong length or with wrong separator
/// characters fails with [`TimeError::Pattern`]; each numeric field must
/// consist entirely of digits and fall within its range (month 1–12, day
/// 1–31, hour 0–23, minute and second 0–59), otherwise the error names the
/// offending field. Field combinations the calendar cannot represent (such
/// as April 31st) fail with [`TimeError::Unrepresentable`].
pub fn string_to_time(input: &str) -> Result<ReadingTime, TimeError> {
    let bytes = input.as_bytes();
    if bytes.len() != 19
        || bytes[4] != b'-'
        || bytes[7] != b'-'
        || bytes[10] != b' '
        || bytes[13] != b':'
        || bytes[16] != b':'
    {
        return Err(TimeError::Pattern {
            input: input.to_string(),
        });
    }

    let year = digits(&input[0..4]).ok_or_else(|| TimeError::Year {
        text: input[0..4].to_string(),
    })?;
    let month = digits(&input[5..7])
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| TimeError::Month {
            text: input[5..7].to_string(),
        })?;
    let day = digits(&input[8..10])
        .filter(|d| (1..=31).contains(d))
        .ok_or_else(|| TimeError::Day {
            text: input[8..10].to_string(),
        })?;
    let hour = digits(&input[11..13])
        .filter(|h| *h <= 23)
        .ok_or_else(|| TimeError::Hour {
            text: input[11..13].to_string(),
        })?;
    let minute = digits(&input[14..16])
        .filter(|m| *m <= 59)
        .ok_or_else(|| TimeError::Minute {
            text: input[14..16].to_string(),
        })?;
    let second = digits(&input[17..19])
        .filter(|s| *s <= 59)
        .ok_or_else(|| TimeError::Second {
            text: input[17..19].to_string(),
        })?;

    Local
        .with_ymd_and_hms(year.cast_signed(), month, day, hour, minute, second)
        .earliest()
        .ok_or_else(|| TimeError::Unrepresentable {
            input: input.to_string(),
        })
}

/// Parses a field consisting entirely of ASCII digits.
///
/// Unlike `str::parse`, this rejects signs and surrounding whitespace, so
/// inputs like `-1` or ` 5` never slip through as canonical fields.
fn digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> ReadingTime {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap()
    }

    #[test]
    fn test_encode_specific_date() {
        let time = local(2022, 4, 23, 19, 8, 1);
        assert_eq!(time_to_string(&time).unwrap(), "2022-04-23 19:08:01");
    }

    #[test]
    fn test_encode_with_leading_zeroes() {
        let time = local(1990, 5, 1, 6, 7, 8);
        assert_eq!(time_to_string(&time).unwrap(), "1990-05-01 06:07:08");
    }

    #[test]
    fn test_encode_without_leading_zeroes() {
        let time = local(2030, 12, 24, 19, 20, 35);
        assert_eq!(time_to_string(&time).unwrap(), "2030-12-24 19:20:35");
    }

    #[test]
    fn test_encode_truncates_subseconds() {
        let time = local(2022, 4, 23, 19, 8, 1)
            .with_nanosecond(999_999_999)
            .unwrap();
        // Truncated, not rounded up to :02.
        assert_eq!(time_to_string(&time).unwrap(), "2022-04-23 19:08:01");
    }

    #[test]
    fn test_decode_specific_dates() {
        assert_eq!(
            string_to_time("2022-04-23 19:08:01").unwrap(),
            local(2022, 4, 23, 19, 8, 1)
        );
        assert_eq!(
            string_to_time("1990-05-01 06:07:08").unwrap(),
            local(1990, 5, 1, 6, 7, 8)
        );
        assert_eq!(
            string_to_time("2030-12-24 19:20:35").unwrap(),
            local(2030, 12, 24, 19, 20, 35)
        );
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let err = string_to_time("2022-05-01 06:07:08f").unwrap_err();
        assert!(err.to_string().contains("pattern"));

        let err = string_to_time("2022-05-01 06:07").unwrap_err();
        assert!(err.to_string().contains("pattern"));

        assert!(string_to_time("").is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_separators() {
        let err = string_to_time("2022/05/01 06:07:08").unwrap_err();
        assert!(matches!(err, TimeError::Pattern { .. }));

        let err = string_to_time("2022-05-01T06:07:08").unwrap_err();
        assert!(matches!(err, TimeError::Pattern { .. }));
    }

    #[test]
    fn test_decode_rejects_invalid_year() {
        let err = string_to_time("-990-05-01 06:07:08").unwrap_err();
        assert!(err.to_string().contains("not a valid year"));

        let err = string_to_time("199Z-05-01 06:07:08").unwrap_err();
        assert!(err.to_string().contains("not a valid year"));
    }

    #[test]
    fn test_decode_rejects_invalid_month() {
        let err = string_to_time("1990-14-01 06:07:08").unwrap_err();
        assert!(err.to_string().contains("not a valid month"));

        let err = string_to_time("1990--1-01 06:07:08").unwrap_err();
        assert!(err.to_string().contains("not a valid month"));
    }

    #[test]
    fn test_decode_rejects_invalid_day() {
        let err = string_to_time("1990-12-32 06:07:08").unwrap_err();
        assert!(err.to_string().contains("not a valid day"));

        let err = string_to_time("1990-01-00 06:07:08").unwrap_err();
        assert!(err.to_string().contains("not a valid day"));
    }

    #[test]
    fn test_decode_rejects_invalid_hour() {
        let err = string_to_time("1990-12-31 25:07:08").unwrap_err();
        assert!(err.to_string().contains("not a valid hour"));

        let err = string_to_time("1990-01-01 -1:07:08").unwrap_err();
        assert!(err.to_string().contains("not a valid hour"));
    }

    #[test]
    fn test_decode_rejects_invalid_minute() {
        let err = string_to_time("1990-12-31 23:60:08").unwrap_err();
        assert!(err.to_string().contains("not a valid minute"));

        let err = string_to_time("1990-01-01 01:-1:08").unwrap_err();
        assert!(err.to_string().contains("not a valid minute"));
    }

    #[test]
    fn test_decode_rejects_invalid_second() {
        let err = string_to_time("1990-12-31 23:10:61").unwrap_err();
        assert!(err.to_string().contains("not a valid second"));

        let err = string_to_time("1990-01-01 01:01:-1").unwrap_err();
        assert!(err.to_string().contains("not a valid second"));
    }

    #[test]
    fn test_decode_rejects_calendar_invalid_day() {
        // Fields pass their individual range checks but April has no 31st.
        let err = string_to_time("2022-04-31 12:00:00").unwrap_err();
        assert!(matches!(err, TimeError::Unrepresentable { .. }));
    }

    #[test]
    fn test_round_trip_from_now() {
        // Truncate to seconds first; the codec only works at that
        // resolution.
        let now = Local::now().with_nanosecond(0).unwrap();
        let back = string_to_time(&time_to_string(&now).unwrap()).unwrap();
        assert_eq!(now, back);
    }

    #[test]
    fn test_round_trip_from_string() {
        let s = time_to_string(&string_to_time("2030-12-24 19:20:35").unwrap()).unwrap();
        assert_eq!(s, "2030-12-24 19:20:35");
    }
}
