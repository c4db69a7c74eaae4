//! Do not use this crate directly.
//!
//! This is the implementation crate for `gsconnect`.
//!

#![deny(missing_debug_implementations)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

#[macro_use]
mod gs_error;

mod base;
mod conn;
mod convert;
pub mod dbapi;
pub mod driver;
mod serde_db_impl;
mod sync;
mod types_impl;
pub mod url;

pub use crate::base::{
    ColumnDescriptor, GsValue, ParameterDescriptor, ParameterMode, ResultSetMetadata, Row,
    Rows, TypeCategory, TypeCode, TypeInfo,
};
pub use crate::conn::{
    ConnectParams, ConnectParamsBuilder, ConnectionConfiguration, ConnectionStatistics,
    Credentials, IntoConnectParams, IntoConnectParamsBuilder,
};
pub use crate::convert::{Adapter, AdapterTable, Converter, ConverterTable, HostType};
pub use crate::gs_error::{GsError, GsResult};
pub use crate::sync::{arrow_schema, connect, ColumnarBatches, Connection, Cursor};
pub use crate::types_impl::{
    binary::{make_binary, Binary},
    timestamp::{make_timestamp, timestamp_from_epoch_seconds, TimePrecision, Timestamp},
};

pub use serde_db::de::{ConversionError, DeserializationError};
pub use arrow;
pub use time;
