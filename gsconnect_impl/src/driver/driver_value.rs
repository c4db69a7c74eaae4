use crate::{types_impl::timestamp::TimePrecision, GsResult, Timestamp};

/// A value in the representation the driver works with.
///
/// Drivers produce these when rows are fetched, and receive them as bound parameters.
/// The [`ConverterTable`](crate::ConverterTable) turns them into
/// [`GsValue`](crate::GsValue)s, the [`AdapterTable`](crate::AdapterTable) does the reverse.
#[derive(Clone, Debug, PartialEq)]
pub enum DriverValue {
    /// SQL NULL.
    Null,
    /// BOOL.
    Bool(bool),
    /// BYTE.
    Byte(i8),
    /// SHORT.
    Short(i16),
    /// INTEGER.
    Integer(i32),
    /// LONG.
    Long(i64),
    /// FLOAT.
    Float(f32),
    /// DOUBLE.
    Double(f64),
    /// STRING.
    String(String),
    /// A plain byte array.
    Bytes(Vec<u8>),
    /// The driver's large-object wrapper, as required by BLOB columns.
    Blob(Blob),
    /// TIMESTAMP, with the precision of its origin.
    Timestamp(DriverTimestamp),
}

impl DriverValue {
    /// Returns true if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The key under which converters for this value are registered;
    /// `None` for `Null`.
    pub fn driver_type(&self) -> Option<DriverType> {
        Some(match self {
            Self::Null => return None,
            Self::Bool(_) => DriverType::Bool,
            Self::Byte(_) => DriverType::Byte,
            Self::Short(_) => DriverType::Short,
            Self::Integer(_) => DriverType::Integer,
            Self::Long(_) => DriverType::Long,
            Self::Float(_) => DriverType::Float,
            Self::Double(_) => DriverType::Double,
            Self::String(_) => DriverType::String,
            Self::Bytes(_) => DriverType::Bytes,
            Self::Blob(_) => DriverType::Blob,
            Self::Timestamp(ts) => match ts.precision() {
                TimePrecision::Milli => DriverType::TimestampMilli,
                TimePrecision::Micro => DriverType::TimestampMicro,
                TimePrecision::Nano => DriverType::TimestampNano,
            },
        })
    }
}

impl std::fmt::Display for DriverValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "<NULL>"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::Blob(v) => write!(f, "<BLOB, {} bytes>", v.len()),
            Self::Timestamp(v) => write!(f, "{v}"),
        }
    }
}

/// The type tags of driver values, used as keys of the
/// [`ConverterTable`](crate::ConverterTable).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DriverType {
    /// `DriverValue::Bool`.
    Bool,
    /// `DriverValue::Byte`.
    Byte,
    /// `DriverValue::Short`.
    Short,
    /// `DriverValue::Integer`.
    Integer,
    /// `DriverValue::Long`.
    Long,
    /// `DriverValue::Float`.
    Float,
    /// `DriverValue::Double`.
    Double,
    /// `DriverValue::String`.
    String,
    /// `DriverValue::Bytes`.
    Bytes,
    /// `DriverValue::Blob`.
    Blob,
    /// `DriverValue::Timestamp` with millisecond precision.
    TimestampMilli,
    /// `DriverValue::Timestamp` with microsecond precision.
    TimestampMicro,
    /// `DriverValue::Timestamp` with nanosecond precision.
    TimestampNano,
}

impl DriverType {
    /// All driver types.
    pub const ALL: [DriverType; 13] = [
        Self::Bool,
        Self::Byte,
        Self::Short,
        Self::Integer,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::String,
        Self::Bytes,
        Self::Blob,
        Self::TimestampMilli,
        Self::TimestampMicro,
        Self::TimestampNano,
    ];
}

/// A timestamp as the driver transports it: seconds since the epoch, a sub-second
/// part in nanoseconds, and the precision of the column or literal it stems from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DriverTimestamp {
    seconds: i64,
    nanos: u32,
    precision: TimePrecision,
}

impl DriverTimestamp {
    /// Creates a `DriverTimestamp` from a `Timestamp`, truncated to the given precision.
    pub fn new(ts: &Timestamp, precision: TimePrecision) -> Self {
        Self {
            seconds: ts.unix_timestamp(),
            nanos: precision.truncate_nanos(ts.nanosecond()),
            precision,
        }
    }

    /// Seconds since the Unix epoch.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Sub-second part in nanoseconds.
    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// The precision.
    pub fn precision(&self) -> TimePrecision {
        self.precision
    }

    /// Returns a copy with the given precision, truncating if necessary.
    #[must_use]
    pub fn with_precision(&self, precision: TimePrecision) -> Self {
        Self {
            seconds: self.seconds,
            nanos: precision.truncate_nanos(self.nanos),
            precision,
        }
    }

    /// Converts into a [`Timestamp`].
    ///
    /// # Errors
    ///
    /// `GsError::DateTime` if the value is outside the representable range.
    pub fn to_timestamp(&self) -> GsResult<Timestamp> {
        Timestamp::from_unix_timestamp_nanos(
            i128::from(self.seconds) * 1_000_000_000 + i128::from(self.nanos),
        )
    }
}

impl std::fmt::Display for DriverTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.to_timestamp() {
            Ok(ts) => ts.fmt_with_digits(self.precision.digits(), f),
            Err(_) => write!(f, "<{}s {}ns>", self.seconds, self.nanos),
        }
    }
}

/// The driver's large-object wrapper for binary data.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Blob(Vec<u8>);

impl Blob {
    /// Creates a new `Blob` with the given content.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the contained bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Converts into the contained bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Total length of the data, in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the `Blob` does not contain data.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::{DriverTimestamp, DriverType, DriverValue};
    use crate::{types_impl::timestamp::TimePrecision, Timestamp};

    #[test]
    fn test_driver_timestamp() {
        let ts = Timestamp::parse_rfc3339("2024-05-18T12:00:00.123456789Z").unwrap();
        let dts = DriverTimestamp::new(&ts, TimePrecision::Micro);
        assert_eq!(123_456_000, dts.nanos());
        assert_eq!("2024-05-18T12:00:00.123456Z", dts.to_string());
        assert_eq!(
            "2024-05-18T12:00:00.123Z",
            dts.with_precision(TimePrecision::Milli).to_string()
        );
        assert_eq!(
            ts.truncate(TimePrecision::Micro),
            dts.to_timestamp().unwrap()
        );

        let before_epoch = Timestamp::parse_rfc3339("1969-12-31T23:59:59.5Z").unwrap();
        let dts = DriverTimestamp::new(&before_epoch, TimePrecision::Nano);
        assert_eq!(-1, dts.seconds());
        assert_eq!(500_000_000, dts.nanos());
        assert_eq!(before_epoch, dts.to_timestamp().unwrap());
    }

    #[test]
    fn test_driver_type() {
        assert_eq!(None, DriverValue::Null.driver_type());
        assert_eq!(
            Some(DriverType::Short),
            DriverValue::Short(7).driver_type()
        );
        let ts = Timestamp::parse_rfc3339("2024-05-18T12:00:00Z").unwrap();
        assert_eq!(
            Some(DriverType::TimestampNano),
            DriverValue::Timestamp(DriverTimestamp::new(&ts, TimePrecision::Nano)).driver_type()
        );
    }
}
