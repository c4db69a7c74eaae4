use crate::{
    driver::{Blob, DriverTimestamp, DriverValue},
    types_impl::timestamp::TimePrecision,
    GsError, GsResult, GsValue,
};
use std::{collections::HashMap, sync::Arc};

/// The type tags of host values, used as keys of the [`AdapterTable`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HostType {
    /// `GsValue::BOOL`.
    Bool,
    /// `GsValue::BYTE`.
    Byte,
    /// `GsValue::SHORT`.
    Short,
    /// `GsValue::INTEGER`.
    Integer,
    /// `GsValue::LONG`.
    Long,
    /// `GsValue::FLOAT`.
    Float,
    /// `GsValue::DOUBLE`.
    Double,
    /// `GsValue::STRING`.
    String,
    /// `GsValue::BINARY`.
    Binary,
    /// `GsValue::TIMESTAMP`.
    Timestamp,
}

impl HostType {
    /// All host types.
    pub const ALL: [HostType; 10] = [
        Self::Bool,
        Self::Byte,
        Self::Short,
        Self::Integer,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::String,
        Self::Binary,
        Self::Timestamp,
    ];
}

type AdaptFn = dyn Fn(GsValue) -> GsResult<DriverValue> + Send + Sync;

/// Converts a host value into the driver representation when it is bound as parameter.
#[derive(Clone)]
pub struct Adapter(Arc<AdaptFn>);

impl Adapter {
    /// Creates an adapter from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(GsValue) -> GsResult<DriverValue> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// The default adaptation: each variant maps to the matching `DriverValue`,
    /// `BINARY` to a plain byte array, `TIMESTAMP` to a nanosecond `DriverTimestamp`.
    pub fn standard() -> Self {
        Self::new(default_adaptation)
    }

    /// Wraps `BINARY` values into the driver's large-object type, as BLOB columns require.
    ///
    /// ```rust
    /// # use gsconnect::{Adapter, Connection, GsResult, HostType};
    /// # fn foo(connection: &Connection) -> GsResult<()> {
    /// connection.set_adapter(HostType::Binary, Adapter::blob())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn blob() -> Self {
        Self::new(|value| match value {
            GsValue::BINARY(bytes) => Ok(DriverValue::Blob(Blob::new(bytes))),
            other => default_adaptation(other),
        })
    }

    /// Applies the adaptation.
    ///
    /// # Errors
    ///
    /// Whatever the adaptation function reports.
    pub fn adapt(&self, value: GsValue) -> GsResult<DriverValue> {
        (self.0)(value)
    }
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Adapter")
    }
}

pub(crate) fn default_adaptation(value: GsValue) -> GsResult<DriverValue> {
    Ok(match value {
        GsValue::NULL => DriverValue::Null,
        GsValue::BOOL(b) => DriverValue::Bool(b),
        GsValue::BYTE(i) => DriverValue::Byte(i),
        GsValue::SHORT(i) => DriverValue::Short(i),
        GsValue::INTEGER(i) => DriverValue::Integer(i),
        GsValue::LONG(i) => DriverValue::Long(i),
        GsValue::FLOAT(f) => DriverValue::Float(f),
        GsValue::DOUBLE(f) => DriverValue::Double(f),
        GsValue::STRING(s) => DriverValue::String(s),
        GsValue::BINARY(b) => DriverValue::Bytes(b),
        GsValue::TIMESTAMP(ts) => {
            DriverValue::Timestamp(DriverTimestamp::new(&ts, TimePrecision::Nano))
        }
        GsValue::DRIVER(dv) => dv,
    })
}

/// The registry of adapters that are applied to bound parameters, keyed by [`HostType`].
///
/// Each connection has its own table, initialized with [`Adapter::standard`] for
/// every host type. `NULL` and `DRIVER` values are bound without adapter.
#[derive(Clone, Debug)]
pub struct AdapterTable {
    adapters: HashMap<HostType, Adapter>,
}

impl Default for AdapterTable {
    fn default() -> Self {
        Self {
            adapters: HostType::ALL
                .iter()
                .map(|ht| (*ht, Adapter::standard()))
                .collect(),
        }
    }
}

impl AdapterTable {
    /// Returns the adapter for the given type, if any.
    pub fn get(&self, host_type: HostType) -> Option<&Adapter> {
        self.adapters.get(&host_type)
    }

    /// Registers an adapter, and returns the one that was registered before.
    pub fn set(&mut self, host_type: HostType, adapter: Adapter) -> Option<Adapter> {
        self.adapters.insert(host_type, adapter)
    }

    /// Removes the adapter for the given type.
    pub fn remove(&mut self, host_type: HostType) -> Option<Adapter> {
        self.adapters.remove(&host_type)
    }

    /// Adapts a value with the adapter that is registered for its type.
    ///
    /// # Errors
    ///
    /// `GsError::Conversion` if no adapter is registered for the value's type,
    /// or whatever the adapter reports.
    pub fn adapt(&self, value: GsValue) -> GsResult<DriverValue> {
        match value {
            GsValue::NULL => Ok(DriverValue::Null),
            GsValue::DRIVER(dv) => Ok(dv),
            value => {
                let host_type = value
                    .host_type()
                    .ok_or(GsError::Impl("value without host type"))?;
                match self.adapters.get(&host_type) {
                    Some(adapter) => adapter.adapt(value),
                    None => Err(GsError::Conversion(format!(
                        "no adapter registered for {host_type:?}"
                    ))),
                }
            }
        }
    }

    pub(crate) fn adapt_all(&self, values: &[GsValue]) -> GsResult<Vec<DriverValue>> {
        values.iter().map(|v| self.adapt(v.clone())).collect()
    }
}
