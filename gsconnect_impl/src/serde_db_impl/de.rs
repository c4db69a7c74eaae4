use crate::{base::Rows, convert::default_conversion, GsError, GsValue, Row};
use serde_db::de::{
    ConversionError, DbValue, DbValueInto, DeserializableResultSet, DeserializableRow,
    DeserializationError,
};
use std::num::{ParseFloatError, ParseIntError};

impl DeserializableResultSet for Rows {
    type Row = Row;
    type Error = GsError;

    fn has_multiple_rows(&mut self) -> Result<bool, DeserializationError> {
        Ok(Rows::has_multiple_rows(self))
    }

    fn next(&mut self) -> Result<Option<Row>, DeserializationError> {
        Ok(Iterator::next(self))
    }

    fn number_of_fields(&self) -> usize {
        self.metadata.len()
    }

    fn field_name(&self, i: usize) -> Option<&str> {
        self.metadata.get(i).map(crate::ColumnDescriptor::name)
    }
}

impl DeserializableRow for Row {
    type Value = GsValue;
    type Error = GsError;

    fn len(&self) -> usize {
        Row::len(self)
    }

    fn next(&mut self) -> Option<GsValue> {
        Row::next_value(self)
    }

    fn number_of_fields(&self) -> usize {
        Row::metadata(self).len()
    }

    fn field_name(&self, field_idx: usize) -> Option<&str> {
        Row::metadata(self)
            .get(field_idx)
            .map(crate::ColumnDescriptor::name)
    }
}

impl DbValue for GsValue {
    fn is_null(&self) -> bool {
        GsValue::is_null(self)
    }
}

// raw driver values are deserialized like their default conversion
fn resolved(value: GsValue) -> Result<GsValue, ConversionError> {
    match value {
        GsValue::DRIVER(dv) => {
            default_conversion(dv).map_err(|e| ConversionError::ValueType(e.to_string()))
        }
        value => Ok(value),
    }
}

impl DbValueInto<bool> for GsValue {
    fn try_into(self) -> Result<bool, ConversionError> {
        match resolved(self)? {
            GsValue::BOOL(b) => Ok(b),
            GsValue::BYTE(1) | GsValue::SHORT(1) | GsValue::INTEGER(1) | GsValue::LONG(1) => {
                Ok(true)
            }
            GsValue::BYTE(0) | GsValue::SHORT(0) | GsValue::INTEGER(0) | GsValue::LONG(0) => {
                Ok(false)
            }
            GsValue::STRING(ref s) if s.eq_ignore_ascii_case("true") => Ok(true),
            GsValue::STRING(ref s) if s.eq_ignore_ascii_case("false") => Ok(false),
            value => Err(wrong_type(&value, "bool")),
        }
    }
}

// all integer types are read through i64
fn as_i64(value: GsValue, ovt: &str) -> Result<i64, ConversionError> {
    match value {
        GsValue::BYTE(i) => Ok(i64::from(i)),
        GsValue::SHORT(i) => Ok(i64::from(i)),
        GsValue::INTEGER(i) => Ok(i64::from(i)),
        GsValue::LONG(i) => Ok(i),
        GsValue::STRING(s) => s.trim().parse().map_err(|e: ParseIntError| parse_int_err(&e)),
        value => Err(wrong_type(&value, ovt)),
    }
}

macro_rules! impl_db_value_into_int {
    ($($t:ty),*) => {
        $(
            impl DbValueInto<$t> for GsValue {
                fn try_into(self) -> Result<$t, ConversionError> {
                    let ovt = stringify!($t);
                    let i = as_i64(resolved(self)?, ovt)?;
                    <$t>::try_from(i).map_err(|_| number_range(i, ovt))
                }
            }
        )*
    };
}
impl_db_value_into_int!(u8, u16, u32, u64, i8, i16, i32);

impl DbValueInto<i64> for GsValue {
    fn try_into(self) -> Result<i64, ConversionError> {
        match resolved(self)? {
            GsValue::TIMESTAMP(ts) => Ok(ts.unix_timestamp()),
            value => as_i64(value, "i64"),
        }
    }
}

impl DbValueInto<f32> for GsValue {
    fn try_into(self) -> Result<f32, ConversionError> {
        match resolved(self)? {
            GsValue::FLOAT(f) => Ok(f),
            GsValue::BYTE(i) => Ok(f32::from(i)),
            GsValue::SHORT(i) => Ok(f32::from(i)),
            GsValue::STRING(s) => s.trim().parse().map_err(|e: ParseFloatError| parse_float_err(&e)),
            value => Err(wrong_type(&value, "f32")),
        }
    }
}

impl DbValueInto<f64> for GsValue {
    fn try_into(self) -> Result<f64, ConversionError> {
        match resolved(self)? {
            GsValue::DOUBLE(f) => Ok(f),
            GsValue::FLOAT(f) => Ok(f64::from(f)),
            GsValue::BYTE(i) => Ok(f64::from(i)),
            GsValue::SHORT(i) => Ok(f64::from(i)),
            GsValue::INTEGER(i) => Ok(f64::from(i)),
            GsValue::STRING(s) => s.trim().parse().map_err(|e: ParseFloatError| parse_float_err(&e)),
            value => Err(wrong_type(&value, "f64")),
        }
    }
}

impl DbValueInto<String> for GsValue {
    fn try_into(self) -> Result<String, ConversionError> {
        trace!("try_into -> String");
        match resolved(self)? {
            GsValue::BOOL(b) => Ok(b.to_string()),
            GsValue::BYTE(i) => Ok(i.to_string()),
            GsValue::SHORT(i) => Ok(i.to_string()),
            GsValue::INTEGER(i) => Ok(i.to_string()),
            GsValue::LONG(i) => Ok(i.to_string()),
            GsValue::FLOAT(f) => Ok(f.to_string()),
            GsValue::DOUBLE(f) => Ok(f.to_string()),
            GsValue::STRING(s) => Ok(s),
            GsValue::TIMESTAMP(ts) => Ok(ts.to_string()),
            value => Err(wrong_type(&value, "String")),
        }
    }
}

impl DbValueInto<Vec<u8>> for GsValue {
    fn try_into(self) -> Result<Vec<u8>, ConversionError> {
        match resolved(self)? {
            GsValue::BINARY(v) => Ok(v),
            GsValue::STRING(s) => Ok(s.into_bytes()),
            value => Err(wrong_type(&value, "Vec<u8>")),
        }
    }
}

fn wrong_type(value: &GsValue, ovt: &str) -> ConversionError {
    ConversionError::ValueType(format!(
        "The value {value:?} cannot be converted into type {ovt}"
    ))
}

fn number_range(value: i64, ovt: &str) -> ConversionError {
    ConversionError::NumberRange(format!(
        "The value {value:?} exceeds the number range of type {ovt}"
    ))
}

fn parse_int_err(e: &ParseIntError) -> ConversionError {
    ConversionError::ValueType(e.to_string())
}

fn parse_float_err(e: &ParseFloatError) -> ConversionError {
    ConversionError::ValueType(e.to_string())
}
