use crate::{
    convert::HostType, driver::DriverValue, Binary, GsResult, Timestamp,
};

/// A host-native value, as it is fetched from a result set or bound as parameter.
///
/// Converting a fetched value into a plain rust type is easiest with
/// [`try_into()`](GsValue::try_into), which works with any type that implements
/// `serde::Deserialize` and fits the value.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, PartialEq)]
pub enum GsValue {
    /// SQL NULL.
    NULL,
    /// BOOL.
    BOOL(bool),
    /// BYTE.
    BYTE(i8),
    /// SHORT.
    SHORT(i16),
    /// INTEGER.
    INTEGER(i32),
    /// LONG.
    LONG(i64),
    /// FLOAT.
    FLOAT(f32),
    /// DOUBLE.
    DOUBLE(f64),
    /// STRING.
    STRING(String),
    /// Binary content, from BLOB columns or byte arrays.
    BINARY(Vec<u8>),
    /// A timestamp of any precision.
    TIMESTAMP(Timestamp),
    /// The unconverted driver value, produced by
    /// [`Converter::raw()`](crate::Converter::raw) or bound without adaptation.
    DRIVER(DriverValue),
}

impl GsValue {
    /// Returns true if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::NULL | Self::DRIVER(DriverValue::Null))
    }

    /// The key under which adapters for this value are registered;
    /// `None` for `NULL` and `DRIVER`, which are bound without adapter.
    pub fn host_type(&self) -> Option<HostType> {
        Some(match self {
            Self::NULL | Self::DRIVER(_) => return None,
            Self::BOOL(_) => HostType::Bool,
            Self::BYTE(_) => HostType::Byte,
            Self::SHORT(_) => HostType::Short,
            Self::INTEGER(_) => HostType::Integer,
            Self::LONG(_) => HostType::Long,
            Self::FLOAT(_) => HostType::Float,
            Self::DOUBLE(_) => HostType::Double,
            Self::STRING(_) => HostType::String,
            Self::BINARY(_) => HostType::Binary,
            Self::TIMESTAMP(_) => HostType::Timestamp,
        })
    }

    /// Deserializes the value into a rust value.
    ///
    /// # Errors
    ///
    /// `GsError::Deserialization` if the value does not fit the target type.
    pub fn try_into<'de, T>(self) -> GsResult<T>
    where
        T: serde::de::Deserialize<'de>,
    {
        trace!("GsValue::try_into()");
        Ok(serde_db::de::DbValue::try_into(self)?)
    }
}

impl std::fmt::Display for GsValue {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NULL => write!(fmt, "<NULL>"),
            Self::BOOL(v) => write!(fmt, "{v}"),
            Self::BYTE(v) => write!(fmt, "{v}"),
            Self::SHORT(v) => write!(fmt, "{v}"),
            Self::INTEGER(v) => write!(fmt, "{v}"),
            Self::LONG(v) => write!(fmt, "{v}"),
            Self::FLOAT(v) => write!(fmt, "{v}"),
            Self::DOUBLE(v) => write!(fmt, "{v}"),
            Self::STRING(v) => write!(fmt, "{v}"),
            Self::BINARY(v) => write!(fmt, "<BINARY length = {}>", v.len()),
            Self::TIMESTAMP(v) => write!(fmt, "{v}"),
            Self::DRIVER(v) => write!(fmt, "{v}"),
        }
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for GsValue {
                fn from(v: $t) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from!(
    bool => BOOL,
    i8 => BYTE,
    i16 => SHORT,
    i32 => INTEGER,
    i64 => LONG,
    f32 => FLOAT,
    f64 => DOUBLE,
    String => STRING,
    Vec<u8> => BINARY,
    Timestamp => TIMESTAMP,
    DriverValue => DRIVER,
);

impl From<&str> for GsValue {
    fn from(s: &str) -> Self {
        Self::STRING(s.to_string())
    }
}

impl From<&[u8]> for GsValue {
    fn from(b: &[u8]) -> Self {
        Self::BINARY(b.to_vec())
    }
}

impl From<Binary> for GsValue {
    fn from(b: Binary) -> Self {
        Self::BINARY(b.into_bytes())
    }
}

impl From<time::OffsetDateTime> for GsValue {
    fn from(odt: time::OffsetDateTime) -> Self {
        Self::TIMESTAMP(Timestamp::from(odt))
    }
}

impl<T: Into<GsValue>> From<Option<T>> for GsValue {
    fn from(o: Option<T>) -> Self {
        match o {
            Some(v) => v.into(),
            None => Self::NULL,
        }
    }
}

/// Builds a `Vec<GsValue>` from a list of expressions that convert into `GsValue`.
///
/// ```rust
/// use gsconnect::{params, GsValue};
/// let p = params![1, "test1", None::<i64>];
/// assert_eq!(GsValue::INTEGER(1), p[0]);
/// assert_eq!(GsValue::NULL, p[2]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        Vec::<$crate::GsValue>::new()
    };
    ($($v:expr),+ $(,)?) => {
        vec![$($crate::GsValue::from($v)),+]
    };
}
