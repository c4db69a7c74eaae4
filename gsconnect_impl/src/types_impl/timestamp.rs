use crate::{GsError, GsResult};
use time::{
    format_description::well_known::Rfc3339, Date, Month, OffsetDateTime, PrimitiveDateTime, Time,
    UtcOffset,
};

/// Sub-second precision of a timestamp column, as number of fractional digits.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum TimePrecision {
    /// Three digits (milliseconds), the default for `TIMESTAMP` columns.
    Milli,
    /// Six digits (microseconds).
    Micro,
    /// Nine digits (nanoseconds).
    Nano,
}
impl TimePrecision {
    /// Number of fractional digits: 3, 6, or 9.
    pub fn digits(self) -> u8 {
        match self {
            Self::Milli => 3,
            Self::Micro => 6,
            Self::Nano => 9,
        }
    }

    /// Maps 3, 6, and 9 to the respective precision.
    pub fn from_digits(digits: u32) -> Option<Self> {
        match digits {
            3 => Some(Self::Milli),
            6 => Some(Self::Micro),
            9 => Some(Self::Nano),
            _ => None,
        }
    }

    /// Cuts off the sub-second digits this precision cannot represent.
    pub fn truncate_nanos(self, nanos: u32) -> u32 {
        match self {
            Self::Milli => nanos - nanos % 1_000_000,
            Self::Micro => nanos - nanos % 1_000,
            Self::Nano => nanos,
        }
    }
}

/// A point in time, in UTC, with nanosecond resolution.
///
/// Instances are created with [`make_timestamp`](crate::make_timestamp),
/// [`timestamp_from_epoch_seconds`](crate::timestamp_from_epoch_seconds),
/// or from a `time::OffsetDateTime`. They can be used directly as bound parameter,
/// and they are what the default converters return for all timestamp columns.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Constructs a timestamp from its calendar components.
    ///
    /// # Errors
    ///
    /// `GsError::DateTime` if a component is out of range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> GsResult<Self> {
        let date = Date::from_calendar_date(year, Month::try_from(month)?, day)?;
        let time = Time::from_hms_nano(hour, minute, second, nanosecond)?;
        Ok(Self(PrimitiveDateTime::new(date, time).assume_utc()))
    }

    /// Converts seconds since the Unix epoch into a timestamp; the fractional part is dropped.
    ///
    /// # Errors
    ///
    /// `GsError::Usage` if `ticks` is not finite,
    /// `GsError::DateTime` if it is outside the representable range.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn from_epoch_seconds(ticks: f64) -> GsResult<Self> {
        if !ticks.is_finite() {
            return Err(GsError::Usage("epoch seconds must be a finite number"));
        }
        let seconds = ticks.floor();
        if seconds < i64::MIN as f64 || seconds > i64::MAX as f64 {
            return Err(GsError::Usage("epoch seconds out of range"));
        }
        let seconds = seconds as i64;
        Ok(Self(OffsetDateTime::from_unix_timestamp(seconds)?))
    }

    /// Converts nanoseconds since the Unix epoch into a timestamp.
    ///
    /// # Errors
    ///
    /// `GsError::DateTime` if the value is outside the representable range.
    pub fn from_unix_timestamp_nanos(nanos: i128) -> GsResult<Self> {
        Ok(Self(OffsetDateTime::from_unix_timestamp_nanos(nanos)?))
    }

    /// Parses an RFC 3339 text like `2024-05-18T12:00:00.123Z`.
    ///
    /// # Errors
    ///
    /// `time::error::Parse` if the text is not a valid RFC 3339 timestamp.
    pub fn parse_rfc3339(s: &str) -> Result<Self, time::error::Parse> {
        Ok(Self::from(OffsetDateTime::parse(s, &Rfc3339)?))
    }

    /// Seconds since the Unix epoch.
    pub fn unix_timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Nanoseconds since the Unix epoch.
    pub fn unix_timestamp_nanos(&self) -> i128 {
        self.0.unix_timestamp_nanos()
    }

    /// The sub-second part, in nanoseconds.
    pub fn nanosecond(&self) -> u32 {
        self.0.nanosecond()
    }

    /// Returns the contained `time::OffsetDateTime` (in UTC).
    pub fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }

    /// Returns a copy with the sub-second part reduced to the given precision.
    #[must_use]
    pub fn truncate(&self, precision: TimePrecision) -> Self {
        let nanos = self.0.nanosecond();
        let dropped = nanos - precision.truncate_nanos(nanos);
        Self(self.0 - time::Duration::nanoseconds(i64::from(dropped)))
    }

    pub(crate) fn fmt_with_digits(
        &self,
        digits: u8,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        let dt = self.0;
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            dt.year(),
            u8::from(dt.month()),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
        )?;
        match digits {
            3 => write!(f, ".{:03}Z", dt.millisecond()),
            6 => write!(f, ".{:06}Z", dt.microsecond()),
            _ => write!(f, ".{:09}Z", dt.nanosecond()),
        }
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(odt: OffsetDateTime) -> Self {
        Self(odt.to_offset(UtcOffset::UTC))
    }
}

impl From<Timestamp> for OffsetDateTime {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_with_digits(9, f)
    }
}

// serialized as RFC 3339 text, with nine fractional digits
impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(TimestampVisitor)
    }
}

struct TimestampVisitor;
impl<'de> serde::de::Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;
    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a String in RFC 3339 format")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Timestamp::parse_rfc3339(v).map_err(E::custom)
    }
}

/// Constructs a timestamp literal with optional sub-second precision up to nanoseconds.
///
/// The result can be used directly as a bound parameter.
///
/// ```rust
/// # use gsconnect::{make_timestamp, GsResult};
/// # fn main() -> GsResult<()> {
/// let ts = make_timestamp(2024, 5, 18, 12, 0, 0, 123_456_789)?;
/// assert_eq!("2024-05-18T12:00:00.123456789Z", ts.to_string());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// `GsError::DateTime` if a component is out of range.
#[allow(clippy::too_many_arguments)]
pub fn make_timestamp(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
) -> GsResult<Timestamp> {
    Timestamp::new(year, month, day, hour, minute, second, nanosecond)
}

/// Converts a Unix epoch offset in seconds into a timestamp, truncating sub-second precision.
///
/// # Errors
///
/// See [`Timestamp::from_epoch_seconds`].
pub fn timestamp_from_epoch_seconds(ticks: f64) -> GsResult<Timestamp> {
    Timestamp::from_epoch_seconds(ticks)
}

#[cfg(test)]
mod test {
    use super::{make_timestamp, timestamp_from_epoch_seconds, TimePrecision, Timestamp};

    #[test]
    fn test_make_timestamp() {
        let ts = make_timestamp(2024, 5, 18, 12, 0, 0, 0).unwrap();
        assert_eq!("2024-05-18T12:00:00.000000000Z", ts.to_string());
        assert_eq!(1_716_033_600, ts.unix_timestamp());

        let ts = make_timestamp(2024, 5, 18, 12, 0, 0, 123_456_789).unwrap();
        assert_eq!(123_456_789, ts.nanosecond());

        assert!(make_timestamp(2024, 13, 1, 0, 0, 0, 0).is_err());
        assert!(make_timestamp(2024, 2, 30, 0, 0, 0, 0).is_err());
        assert!(make_timestamp(2024, 1, 1, 24, 0, 0, 0).is_err());
        assert!(make_timestamp(2024, 1, 1, 0, 0, 0, 1_000_000_000).is_err());
    }

    #[test]
    fn test_from_epoch_seconds() {
        let ts = timestamp_from_epoch_seconds(1_716_033_600.987).unwrap();
        assert_eq!(1_716_033_600, ts.unix_timestamp());
        assert_eq!(0, ts.nanosecond());
        assert_eq!(
            make_timestamp(2024, 5, 18, 12, 0, 0, 0).unwrap(),
            timestamp_from_epoch_seconds(1_716_033_600.0).unwrap()
        );
        assert_eq!(-1, timestamp_from_epoch_seconds(-0.5).unwrap().unix_timestamp());
        assert!(timestamp_from_epoch_seconds(f64::NAN).is_err());
        assert!(timestamp_from_epoch_seconds(f64::INFINITY).is_err());
    }

    #[test]
    fn test_precision() {
        let ts = Timestamp::parse_rfc3339("2024-05-18T12:00:00.123456789Z").unwrap();
        assert_eq!(123_000_000, ts.truncate(TimePrecision::Milli).nanosecond());
        assert_eq!(123_456_000, ts.truncate(TimePrecision::Micro).nanosecond());
        assert_eq!(ts, ts.truncate(TimePrecision::Nano));
        assert_eq!(Some(TimePrecision::Micro), TimePrecision::from_digits(6));
        assert_eq!(None, TimePrecision::from_digits(4));
        assert_eq!(9, TimePrecision::Nano.digits());
    }

    #[test]
    fn test_parse_with_offset() {
        let ts = Timestamp::parse_rfc3339("2024-05-18T21:00:00+09:00").unwrap();
        assert_eq!("2024-05-18T12:00:00.000000000Z", ts.to_string());
        assert!(Timestamp::parse_rfc3339("2024-05-18 12:00:00").is_err());
    }

    #[test]
    fn test_serde() {
        let ts = make_timestamp(2024, 5, 18, 12, 0, 0, 5).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(r#""2024-05-18T12:00:00.000000005Z""#, json);
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }
}
