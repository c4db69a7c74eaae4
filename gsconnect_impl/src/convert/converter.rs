use crate::{
    driver::{DriverType, DriverValue},
    GsResult, GsValue,
};
use std::{collections::HashMap, sync::Arc};

type ConvertFn = dyn Fn(DriverValue) -> GsResult<GsValue> + Send + Sync;

/// Converts a fetched driver value into a host-native [`GsValue`].
///
/// ```rust
/// use gsconnect::{driver::DriverValue, Converter, GsValue};
///
/// // deliver all BYTE values as LONG
/// let widening = Converter::new(|dv| match dv {
///     DriverValue::Byte(b) => Ok(GsValue::LONG(i64::from(b))),
///     other => Converter::standard().convert(other),
/// });
/// assert_eq!(GsValue::LONG(7), widening.convert(DriverValue::Byte(7)).unwrap());
/// ```
#[derive(Clone)]
pub struct Converter(Arc<ConvertFn>);

impl Converter {
    /// Creates a converter from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(DriverValue) -> GsResult<GsValue> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// The default conversion: each driver type maps to the matching `GsValue` variant,
    /// `Bytes` and `Blob` map to `BINARY`, all timestamp precisions map to `TIMESTAMP`.
    pub fn standard() -> Self {
        Self::new(default_conversion)
    }

    /// Bypasses conversion; the driver value is delivered as `GsValue::DRIVER`.
    pub fn raw() -> Self {
        Self::new(|dv| Ok(GsValue::DRIVER(dv)))
    }

    /// Applies the conversion.
    ///
    /// # Errors
    ///
    /// Whatever the conversion function reports.
    pub fn convert(&self, value: DriverValue) -> GsResult<GsValue> {
        (self.0)(value)
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Converter")
    }
}

pub(crate) fn default_conversion(value: DriverValue) -> GsResult<GsValue> {
    Ok(match value {
        DriverValue::Null => GsValue::NULL,
        DriverValue::Bool(b) => GsValue::BOOL(b),
        DriverValue::Byte(i) => GsValue::BYTE(i),
        DriverValue::Short(i) => GsValue::SHORT(i),
        DriverValue::Integer(i) => GsValue::INTEGER(i),
        DriverValue::Long(i) => GsValue::LONG(i),
        DriverValue::Float(f) => GsValue::FLOAT(f),
        DriverValue::Double(f) => GsValue::DOUBLE(f),
        DriverValue::String(s) => GsValue::STRING(s),
        DriverValue::Bytes(b) => GsValue::BINARY(b),
        DriverValue::Blob(blob) => GsValue::BINARY(blob.into_bytes()),
        DriverValue::Timestamp(ts) => GsValue::TIMESTAMP(ts.to_timestamp()?),
    })
}

/// The registry of converters that are applied to fetched values, keyed by [`DriverType`].
///
/// Each connection has its own table, initialized with [`Converter::standard`] for
/// every driver type. A type without converter is delivered unconverted,
/// as `GsValue::DRIVER`. `NULL` never consults the table.
#[derive(Clone, Debug)]
pub struct ConverterTable {
    converters: HashMap<DriverType, Converter>,
}

impl Default for ConverterTable {
    fn default() -> Self {
        Self {
            converters: DriverType::ALL
                .iter()
                .map(|dt| (*dt, Converter::standard()))
                .collect(),
        }
    }
}

impl ConverterTable {
    /// Returns the converter for the given type, if any.
    pub fn get(&self, driver_type: DriverType) -> Option<&Converter> {
        self.converters.get(&driver_type)
    }

    /// Registers a converter, and returns the one that was registered before.
    pub fn set(&mut self, driver_type: DriverType, converter: Converter) -> Option<Converter> {
        self.converters.insert(driver_type, converter)
    }

    /// Removes the converter for the given type.
    pub fn remove(&mut self, driver_type: DriverType) -> Option<Converter> {
        self.converters.remove(&driver_type)
    }

    /// Converts a value with the converter that is registered for its type.
    ///
    /// # Errors
    ///
    /// Whatever the converter reports.
    pub fn convert(&self, value: DriverValue) -> GsResult<GsValue> {
        match value.driver_type() {
            None => Ok(GsValue::NULL),
            Some(driver_type) => match self.converters.get(&driver_type) {
                Some(converter) => converter.convert(value),
                None => Ok(GsValue::DRIVER(value)),
            },
        }
    }
}
