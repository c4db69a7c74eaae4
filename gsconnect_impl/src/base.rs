mod column_descriptor;
mod gs_value;
mod parameter_descriptor;
mod placeholders;
mod row;
mod rows;
mod type_code;
mod type_info;

pub(crate) use placeholders::count_placeholders;
pub use {
    column_descriptor::{ColumnDescriptor, ResultSetMetadata},
    gs_value::GsValue,
    parameter_descriptor::{ParameterDescriptor, ParameterMode},
    row::Row,
    rows::Rows,
    type_code::{TypeCategory, TypeCode},
    type_info::TypeInfo,
};
