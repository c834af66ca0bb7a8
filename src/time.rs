//! RFC 3339 offset date-times, normalized to UTC.

#[cfg(test)]
#[path = "./time_tests.rs"]
mod tests;

use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;
const MAX_YEAR: i32 = 9999;

/// An instant parsed from an RFC 3339 date-time and normalized to UTC.
///
/// Any number of fractional-second digits is accepted; digits beyond
/// nanosecond resolution are truncated. The original offset is applied and
/// then discarded, so `1979-05-27T00:32:00-07:00` and `1979-05-27T07:32:00Z`
/// compare equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Datetime {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    const DAYS: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[month as usize]
    }
}

// Days since 1970-01-01 in the proleptic Gregorian calendar.
fn days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let y = year as i64 - if month <= 2 { 1 } else { 0 };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year as i32, month, day)
}

impl Datetime {
    /// Creates a UTC date-time from its components, returning `None` when a
    /// component is out of range.
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> Option<Self> {
        if !(0..=MAX_YEAR).contains(&year)
            || month < 1
            || month > 12
            || day < 1
            || day > days_in_month(year, month)
            || hour > 23
            || minute > 59
            || second > 59
            || nanosecond > 999_999_999
        {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond,
        })
    }

    /// Parses a complete RFC 3339 date-time such as
    /// `1979-05-27T07:32:00.999999-07:00`.
    ///
    /// The date and time may be separated by `T`, `t` or a single space. The
    /// offset (`Z`, `z` or `±hh:mm`) is required, as are the seconds.
    pub fn parse(input: &str) -> Option<Self> {
        enum State {
            Year,
            Month,
            Day,
            Hour,
            Minute,
            Second,
            Frac,
            OffHour,
            OffMin,
        }
        let input = input.as_bytes();
        let mut state = State::Year;

        let (mut year, mut month, mut day) = (0i32, 0u8, 0u8);
        let (mut hour, mut minute, mut second) = (0u8, 0u8, 0u8);
        let mut nanos = 0u32;
        let mut off_sign = 1i64;
        let mut off_hour = 0i64;

        let mut current = 0u32;
        let mut len = 0u32;
        let mut i = 0usize;

        let offset_minutes = 'outer: loop {
            let byte = input.get(i).copied().unwrap_or(0);
            if byte.is_ascii_digit() {
                len += 1;
                if len <= 9 {
                    current = current * 10 + (byte - b'0') as u32;
                }
                i += 1;
                continue;
            }
            'next: {
                match state {
                    State::Year => {
                        if len != 4 || byte != b'-' {
                            return None;
                        }
                        year = current as i32;
                        state = State::Month;
                        break 'next;
                    }
                    State::Month => {
                        if len != 2 || byte != b'-' || current < 1 || current > 12 {
                            return None;
                        }
                        month = current as u8;
                        state = State::Day;
                        break 'next;
                    }
                    State::Day => {
                        if len != 2 || current < 1 || current > days_in_month(year, month) as u32 {
                            return None;
                        }
                        day = current as u8;
                        if !matches!(byte, b'T' | b't' | b' ') {
                            return None;
                        }
                        state = State::Hour;
                        break 'next;
                    }
                    State::Hour => {
                        if len != 2 || byte != b':' || current > 23 {
                            return None;
                        }
                        hour = current as u8;
                        state = State::Minute;
                        break 'next;
                    }
                    State::Minute => {
                        if len != 2 || byte != b':' || current > 59 {
                            return None;
                        }
                        minute = current as u8;
                        state = State::Second;
                        break 'next;
                    }
                    State::Second => {
                        if len != 2 || current > 59 {
                            return None;
                        }
                        second = current as u8;
                        if byte == b'.' {
                            state = State::Frac;
                            break 'next;
                        }
                        // fallthrough to the offset
                    }
                    State::Frac => {
                        if len == 0 {
                            return None;
                        }
                        let mut digits = len.min(9);
                        nanos = current;
                        while digits < 9 {
                            nanos *= 10;
                            digits += 1;
                        }
                        // fallthrough to the offset
                    }
                    State::OffHour => {
                        if len != 2 || byte != b':' || current > 23 {
                            return None;
                        }
                        off_hour = current as i64;
                        state = State::OffMin;
                        break 'next;
                    }
                    State::OffMin => {
                        if len != 2 || current > 59 {
                            return None;
                        }
                        break 'outer off_sign * (off_hour * 60 + current as i64);
                    }
                }
                match byte {
                    b'Z' | b'z' => {
                        i += 1;
                        break 'outer 0;
                    }
                    b'+' => {
                        off_sign = 1;
                        state = State::OffHour;
                    }
                    b'-' => {
                        off_sign = -1;
                        state = State::OffHour;
                    }
                    _ => return None,
                }
            }
            i += 1;
            current = 0;
            len = 0;
        };

        if i != input.len() {
            return None;
        }

        let local = days_from_civil(year, month, day) * SECONDS_PER_DAY
            + hour as i64 * 3600
            + minute as i64 * 60
            + second as i64;
        let utc = Self::from_unix(local - offset_minutes * 60, nanos);
        // The offset may carry the instant past the four-digit year range.
        (0..=MAX_YEAR).contains(&utc.year).then_some(utc)
    }

    fn from_unix(seconds: i64, nanosecond: u32) -> Self {
        let days = seconds.div_euclid(SECONDS_PER_DAY);
        let rem = seconds.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: (rem % 3600 / 60) as u8,
            second: (rem % 60) as u8,
            nanosecond,
        }
    }

    /// Seconds since `1970-01-01T00:00:00Z`, ignoring the sub-second part.
    pub fn unix_timestamp(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day) * SECONDS_PER_DAY
            + self.hour as i64 * 3600
            + self.minute as i64 * 60
            + self.second as i64
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn nanosecond(&self) -> u32 {
        self.nanosecond
    }
}

/// Formats as RFC 3339 in UTC, e.g. `1979-05-27T07:32:00.5Z`. Trailing zeros
/// of the fractional part are omitted.
impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if self.nanosecond != 0 {
            let frac = format!("{:09}", self.nanosecond);
            write!(f, ".{}", frac.trim_end_matches('0'))?;
        }
        f.write_str("Z")
    }
}

impl fmt::Debug for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Datetime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
