// Registries that translate between host values and driver values.

mod adapter;
mod converter;

pub(crate) use converter::default_conversion;
pub use {
    adapter::{Adapter, AdapterTable, HostType},
    converter::{Converter, ConverterTable},
};
