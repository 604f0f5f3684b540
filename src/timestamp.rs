//! RFC 5424 `TIMESTAMP`, the RFC 3339 profile without lowercase separators,
//! with at most six fraction digits and a mandatory offset.
//!
//! ```text
//! FULL-DATE "T" PARTIAL-TIME ["." 1*6DIGIT] ("Z" / ("+" / "-") HH ":" MM)
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Timelike};

use crate::cursor::Cursor;
use crate::error::{Error, Invalid, Malformed};

const MAX_FRACTION_DIGITS: usize = 6;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// Wall clock time, `second` may be 60 for a leap second.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sign {
    Plus,
    Minus,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Offset {
    /// `Z`
    Utc,
    /// `+HH:MM` or `-HH:MM`. `+00:00` and `-00:00` are kept apart from `Z`.
    Fixed { sign: Sign, hours: u8, minutes: u8 },
}

impl Offset {
    /// Offset east of UTC, in seconds.
    pub fn seconds(&self) -> i32 {
        match *self {
            Offset::Utc => 0,
            Offset::Fixed {
                sign,
                hours,
                minutes,
            } => {
                let secs = hours as i32 * 3600 + minutes as i32 * 60;
                match sign {
                    Sign::Plus => secs,
                    Sign::Minus => -secs,
                }
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    pub date: Date,
    pub time: Time,
    /// Fraction of second digits exactly as they appear on the wire, so
    /// `.003` and `.0030` stay distinct.
    pub fraction: Option<String>,
    pub offset: Offset,
}

impl Timestamp {
    pub fn new(date: Date, time: Time, offset: Offset) -> Self {
        Timestamp {
            date,
            time,
            fraction: None,
            offset,
        }
    }

    pub fn with_fraction(mut self, digits: impl Into<String>) -> Self {
        self.fraction = Some(digits.into());
        self
    }

    /// Parse a complete buffer holding only a timestamp.
    pub fn parse(buf: &[u8]) -> Result<Self, Error> {
        let mut cursor = Cursor::new(buf);
        let ts = parse(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(cursor.error(Malformed::TrailingData));
        }
        Ok(ts)
    }

    /// Check every component is in range for the wire format.
    pub fn validate(&self) -> Result<(), Error> {
        let out_of_range = || Error::invalid("timestamp", Invalid::OutOfRange);

        let Date { year, month, day } = self.date;
        if year > 9999 || !(1..=12).contains(&month) {
            return Err(out_of_range());
        }
        if NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).is_none() {
            return Err(out_of_range());
        }

        let Time {
            hour,
            minute,
            second,
        } = self.time;
        if hour > 23 || minute > 59 || second > 60 {
            return Err(out_of_range());
        }

        if let Some(digits) = &self.fraction {
            if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
                return Err(Error::invalid("timestamp fraction", Invalid::NotDigits));
            }
            if digits.len() > MAX_FRACTION_DIGITS {
                return Err(Error::invalid(
                    "timestamp fraction",
                    Invalid::TooLong(MAX_FRACTION_DIGITS),
                ));
            }
        }

        if let Offset::Fixed { hours, minutes, .. } = self.offset {
            if hours > 23 || minutes > 59 {
                return Err(Error::invalid("timestamp offset", Invalid::OutOfRange));
            }
        }

        Ok(())
    }

    /// Validate and render the wire form.
    pub fn encode(&self) -> Result<String, Error> {
        self.validate()?;
        Ok(self.to_string())
    }

    /// Sub-second part in nanoseconds.
    pub fn nanosecond(&self) -> u32 {
        match &self.fraction {
            None => 0,
            Some(digits) => {
                let len = digits.len().min(9);
                let value = digits.bytes().take(len).fold(0u32, |acc, c| {
                    acc * 10 + c.wrapping_sub(b'0').min(9) as u32
                });
                value * 10u32.pow(9 - len as u32)
            }
        }
    }

    /// Convert into a chrono timestamp. A leap second is carried in the
    /// nanosecond field the way chrono represents it.
    pub fn to_datetime(&self) -> Result<DateTime<FixedOffset>, Error> {
        self.validate()?;
        let invalid = || Error::invalid("timestamp", Invalid::OutOfRange);

        let (second, nanos) = if self.time.second == 60 {
            (59, self.nanosecond() + 1_000_000_000)
        } else {
            (self.time.second as u32, self.nanosecond())
        };

        let offset = FixedOffset::east_opt(self.offset.seconds()).ok_or_else(invalid)?;
        let datetime = NaiveDate::from_ymd_opt(
            self.date.year as i32,
            self.date.month as u32,
            self.date.day as u32,
        )
        .and_then(|date| {
            date.and_hms_nano_opt(self.time.hour as u32, self.time.minute as u32, second, nanos)
        })
        .ok_or_else(invalid)?;

        offset.from_local_datetime(&datetime).single().ok_or_else(invalid)
    }
}

impl TryFrom<DateTime<FixedOffset>> for Timestamp {
    type Error = Error;

    /// Keeps microsecond precision; sub-minute parts of the offset are dropped.
    fn try_from(dt: DateTime<FixedOffset>) -> Result<Self, Self::Error> {
        let year = u16::try_from(dt.year())
            .ok()
            .filter(|year| *year <= 9999)
            .ok_or(Error::invalid("timestamp", Invalid::OutOfRange))?;

        let (second, nanos) = match dt.nanosecond() {
            n if n >= 1_000_000_000 => (60, n - 1_000_000_000),
            n => (dt.second() as u8, n),
        };

        let east = dt.offset().local_minus_utc();
        let offset = if east == 0 {
            Offset::Utc
        } else {
            Offset::Fixed {
                sign: if east < 0 { Sign::Minus } else { Sign::Plus },
                hours: (east.unsigned_abs() / 3600) as u8,
                minutes: (east.unsigned_abs() % 3600 / 60) as u8,
            }
        };

        let micros = nanos / 1000;
        Ok(Timestamp {
            date: Date {
                year,
                month: dt.month() as u8,
                day: dt.day() as u8,
            },
            time: Time {
                hour: dt.hour() as u8,
                minute: dt.minute() as u8,
                second,
            },
            fraction: (micros != 0).then(|| format!("{micros:06}")),
            offset,
        })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.date.year,
            self.date.month,
            self.date.day,
            self.time.hour,
            self.time.minute,
            self.time.second
        )?;
        if let Some(digits) = &self.fraction {
            write!(f, ".{digits}")?;
        }
        match self.offset {
            Offset::Utc => f.write_str("Z"),
            Offset::Fixed {
                sign,
                hours,
                minutes,
            } => {
                let sign = match sign {
                    Sign::Plus => '+',
                    Sign::Minus => '-',
                };
                write!(f, "{sign}{hours:02}:{minutes:02}")
            }
        }
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s.as_bytes())
    }
}

/// Parse `-` as an absent timestamp, anything else as a full one.
pub(crate) fn parse_optional(cursor: &mut Cursor<'_>) -> Result<Option<Timestamp>, Error> {
    // a timestamp always starts with a year digit, a leading `-` can only
    // be the nil value
    if cursor.eat(b'-') {
        return Ok(None);
    }
    parse(cursor).map(Some)
}

/// Parse a timestamp at the cursor, leaving it on the byte after the offset.
pub(crate) fn parse(cursor: &mut Cursor<'_>) -> Result<Timestamp, Error> {
    let year = cursor.fixed_digits(4)?;
    cursor.expect(b'-')?;
    let month = ranged(cursor, 1, 12, "month")?;
    cursor.expect(b'-')?;
    let day_at = cursor.position();
    let day = ranged(cursor, 1, 31, "day")?;
    if NaiveDate::from_ymd_opt(year as i32, month, day).is_none() {
        return Err(cursor.error_at(day_at, Malformed::InvalidDate));
    }

    cursor.expect(b'T')?;
    let hour = ranged(cursor, 0, 23, "hour")?;
    cursor.expect(b':')?;
    let minute = ranged(cursor, 0, 59, "minute")?;
    cursor.expect(b':')?;
    let second = ranged(cursor, 0, 60, "second")?;

    let fraction = if cursor.eat(b'.') {
        let at = cursor.position();
        let digits = cursor.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(cursor.error(Malformed::TooFewDigits));
        }
        if digits.len() > MAX_FRACTION_DIGITS {
            return Err(cursor.error_at(at, Malformed::TooManyDigits));
        }
        Some(digits.iter().map(|&c| c as char).collect())
    } else {
        None
    };

    let offset = match cursor.peek() {
        Some(b'Z') => {
            cursor.advance(1);
            Offset::Utc
        }
        Some(c @ (b'+' | b'-')) => {
            cursor.advance(1);
            let sign = if c == b'+' { Sign::Plus } else { Sign::Minus };
            let at = cursor.position();
            let hours = cursor.fixed_digits(2)?;
            cursor.expect(b':')?;
            let minutes = cursor.fixed_digits(2)?;
            if hours > 23 || minutes > 59 {
                return Err(cursor.error_at(at, Malformed::InvalidUtcOffset));
            }
            Offset::Fixed {
                sign,
                hours: hours as u8,
                minutes: minutes as u8,
            }
        }
        Some(_) => return Err(cursor.error(Malformed::InvalidUtcOffset)),
        None => return Err(cursor.error(Malformed::UnexpectedEndOfInput)),
    };

    Ok(Timestamp {
        date: Date {
            year: year as u16,
            month: month as u8,
            day: day as u8,
        },
        time: Time {
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
        },
        fraction,
        offset,
    })
}

fn ranged(cursor: &mut Cursor<'_>, min: u32, max: u32, what: &'static str) -> Result<u32, Error> {
    let at = cursor.position();
    let value = cursor.fixed_digits(2)?;
    if value < min || value > max {
        return Err(cursor.error_at(at, Malformed::OutOfRange(what)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Timestamp {
        Timestamp::new(
            Date { year, month, day },
            Time {
                hour,
                minute,
                second,
            },
            Offset::Utc,
        )
    }

    #[test]
    fn timestamp() {
        let ts = Timestamp::parse(b"2015-02-18T23:16:09Z").unwrap();
        assert_eq!(ts, utc(2015, 2, 18, 23, 16, 9));

        let ts = Timestamp::parse(b"2015-02-18T23:59:59.234567+05:00").unwrap();
        assert_eq!(ts.fraction.as_deref(), Some("234567"));
        assert_eq!(
            ts.offset,
            Offset::Fixed {
                sign: Sign::Plus,
                hours: 5,
                minutes: 0
            }
        );
        let edt = FixedOffset::east_opt(5 * 60 * 60).unwrap();
        assert_eq!(
            edt.from_local_datetime(
                &NaiveDate::from_ymd_opt(2015, 2, 18)
                    .unwrap()
                    .and_hms_micro_opt(23, 59, 59, 234_567)
                    .unwrap()
            )
            .unwrap(),
            ts.to_datetime().unwrap()
        )
    }

    #[test]
    fn compare() {
        // https://datatracker.ietf.org/doc/html/rfc3339#section-5.8
        for input in [
            "1985-04-12T23:20:50.52Z",
            "1996-12-19T16:39:57-08:00",
            "1990-12-31T23:59:59Z",
            "1990-12-31T15:59:59-08:00",
            "1937-01-01T12:00:27.87+00:20",
            "2003-08-24T05:14:15.000003-07:00",
        ] {
            let got = Timestamp::parse(input.as_bytes()).unwrap();
            let want = DateTime::parse_from_rfc3339(input).unwrap();
            assert_eq!(got.to_datetime().unwrap(), want, "input: {input}");
            assert_eq!(got.to_string(), input);
        }
    }

    #[test]
    fn leap_second() {
        let ts = Timestamp::parse(b"1990-12-31T23:59:60Z").unwrap();
        assert_eq!(ts.time.second, 60);
        let dt = ts.to_datetime().unwrap();
        assert_eq!(dt.nanosecond(), 1_000_000_000);
        assert_eq!(Timestamp::try_from(dt).unwrap(), ts);
    }

    #[test]
    fn negative_zero_offset_is_kept() {
        let ts = Timestamp::parse(b"2015-01-01T00:00:00-00:00").unwrap();
        assert_eq!(ts.to_string(), "2015-01-01T00:00:00-00:00");
        assert_ne!(ts, Timestamp::parse(b"2015-01-01T00:00:00Z").unwrap());
    }

    #[test]
    fn rejects() {
        for input in [
            "2015-13-01T00:00:00Z",
            "2015-02-29T00:00:00Z",
            "2015-02-18T24:00:00Z",
            "2015-02-18T23:60:00Z",
            "2015-02-18T23:00:61Z",
            "2015-02-18T23:00:00",
            "2015-02-18T23:00:00.Z",
            "2003-08-24T05:14:15.000000003+07:00",
            "2015-02-18t23:00:00Z",
            "2015-02-18T23:00:00z",
            "2015-02-18T23:00:00+24:00",
            "2015-02-18T23:00:00+05",
            "15-02-18T23:00:00Z",
            "2015-02-18T23:00:00Zjunk",
        ] {
            let err = Timestamp::parse(input.as_bytes()).unwrap_err();
            assert!(err.is_malformed(), "input: {input}, err: {err}");
        }
    }

    #[test]
    fn error_offsets() {
        assert_eq!(
            Timestamp::parse(b"2015-02-30T00:00:00Z").unwrap_err(),
            Error::MalformedMessage {
                offset: 8,
                kind: Malformed::InvalidDate
            }
        );
        assert_eq!(
            Timestamp::parse(b"2015-02-18T23:00:00").unwrap_err(),
            Error::MalformedMessage {
                offset: 19,
                kind: Malformed::UnexpectedEndOfInput
            }
        );
    }

    #[test]
    fn leap_year() {
        assert!(Timestamp::parse(b"2016-02-29T00:00:00Z").is_ok());
        assert!(Timestamp::parse(b"2000-02-29T00:00:00Z").is_ok());
        assert!(Timestamp::parse(b"1900-02-29T00:00:00Z").is_err());
    }

    #[test]
    fn encode_validates() {
        assert_eq!(
            utc(2003, 10, 11, 22, 14, 15)
                .with_fraction("003")
                .encode()
                .unwrap(),
            "2003-10-11T22:14:15.003Z"
        );

        for ts in [
            utc(2003, 13, 11, 22, 14, 15),
            utc(2003, 4, 31, 22, 14, 15),
            utc(10000, 1, 1, 0, 0, 0),
            utc(2003, 10, 11, 24, 14, 15),
            utc(2003, 10, 11, 22, 14, 61),
            utc(2003, 10, 11, 22, 14, 15).with_fraction(""),
            utc(2003, 10, 11, 22, 14, 15).with_fraction("1234567"),
            utc(2003, 10, 11, 22, 14, 15).with_fraction("0x1"),
        ] {
            assert!(ts.encode().unwrap_err().is_invalid_value(), "{ts:?}");
        }

        let mut ts = utc(2003, 10, 11, 22, 14, 15);
        ts.offset = Offset::Fixed {
            sign: Sign::Minus,
            hours: 7,
            minutes: 60,
        };
        assert!(ts.encode().is_err());
    }

    #[test]
    fn from_chrono() {
        let dt = DateTime::parse_from_rfc3339("2020-05-22T14:59:09.250-03:00").unwrap();
        let ts = Timestamp::try_from(dt).unwrap();
        assert_eq!(ts.to_string(), "2020-05-22T14:59:09.250000-03:00");
        assert_eq!(ts.to_datetime().unwrap(), dt);

        let dt = DateTime::parse_from_rfc3339("2020-05-22T14:59:09+00:00").unwrap();
        assert_eq!(
            Timestamp::try_from(dt).unwrap(),
            utc(2020, 5, 22, 14, 59, 9)
        );
    }
}
