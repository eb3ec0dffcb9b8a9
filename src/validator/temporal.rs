//! A string is a valid date, datetime or time only if parsing it with one of
//! the accepted formats and formatting the result back yields the same
//! string. Calendar overflows such as "2020-04-31" are rejected rather than
//! rolled over, as are unpadded fields. Each string must also have the
//! exact shape of its format, so signed years and leap seconds are rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATE: &str = "%Y-%m-%d";
const TIME: &str = "%H:%M:%S";
const DATETIME: &str = "%Y-%m-%d %H:%M:%S";
const DATETIME_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%:z";
const DATETIME_UTC: &str = "%Y-%m-%dT%H:%M:%SZ";

// '9' stands for an ASCII digit and '+' for either sign
const DATE_SHAPE: &str = "9999-99-99";
const TIME_SHAPE: &str = "99:99:99";
const DATETIME_SHAPE: &str = "9999-99-99 99:99:99";
const DATETIME_OFFSET_SHAPE: &str = "9999-99-99T99:99:99+99:99";
const DATETIME_UTC_SHAPE: &str = "9999-99-99T99:99:99Z";

fn has_shape(s: &str, shape: &str) -> bool {
  s.len() == shape.len()
    && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
      b'9' => c.is_ascii_digit(),
      b'+' => c == b'+' || c == b'-',
      _ => c == p,
    })
}

// chrono represents second 60 as a nanosecond overflow
fn is_leap_second<T: Timelike>(t: &T) -> bool {
  t.nanosecond() >= 1_000_000_000
}

/// `YYYY-MM-DD`
pub fn is_date(s: &str) -> bool {
  has_shape(s, DATE_SHAPE)
    && NaiveDate::parse_from_str(s, DATE).map_or(false, |d| d.format(DATE).to_string() == s)
}

/// `HH:MM:SS`, 24-hour clock
pub fn is_time(s: &str) -> bool {
  has_shape(s, TIME_SHAPE)
    && NaiveTime::parse_from_str(s, TIME)
      .map_or(false, |t| !is_leap_second(&t) && t.format(TIME).to_string() == s)
}

/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS+HH:MM` or
/// `YYYY-MM-DDTHH:MM:SSZ`
pub fn is_datetime(s: &str) -> bool {
  let naive = |format: &str, shape: &str| {
    has_shape(s, shape)
      && NaiveDateTime::parse_from_str(s, format)
        .map_or(false, |dt| !is_leap_second(&dt) && dt.format(format).to_string() == s)
  };

  naive(DATETIME, DATETIME_SHAPE)
    || naive(DATETIME_UTC, DATETIME_UTC_SHAPE)
    || (has_shape(s, DATETIME_OFFSET_SHAPE)
      && DateTime::parse_from_str(s, DATETIME_OFFSET).map_or(false, |dt| {
        !is_leap_second(&dt) && dt.format(DATETIME_OFFSET).to_string() == s
      }))
}
