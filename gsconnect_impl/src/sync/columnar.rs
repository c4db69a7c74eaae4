use super::result_set::ResultSet;
use crate::{
    conn::ConnectionCore, driver::DriverValue, ColumnDescriptor, GsError, GsResult,
    ResultSetMetadata, TypeCode,
};
use arrow::{
    array::{
        ArrayRef, BinaryBuilder, BooleanBuilder, Float32Builder, Float64Builder, Int16Builder,
        Int32Builder, Int64Builder, Int8Builder, StringBuilder, TimestampNanosecondBuilder,
    },
    datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit},
    record_batch::RecordBatch,
};
use std::sync::Arc;

const UTC: &str = "UTC";

/// Derives the arrow schema of a result set.
///
/// Timestamps of every precision are exported as UTC nanoseconds,
/// columns of unknown type in their textual form.
pub fn arrow_schema(metadata: &ResultSetMetadata) -> Schema {
    Schema::new(
        metadata
            .iter()
            .map(|cd| Field::new(cd.name(), arrow_type(cd.type_code()), cd.null_ok()))
            .collect::<Vec<_>>(),
    )
}

fn arrow_type(type_code: TypeCode) -> DataType {
    match type_code {
        TypeCode::BOOL => DataType::Boolean,
        TypeCode::BYTE => DataType::Int8,
        TypeCode::SHORT => DataType::Int16,
        TypeCode::INTEGER => DataType::Int32,
        TypeCode::LONG => DataType::Int64,
        TypeCode::FLOAT => DataType::Float32,
        TypeCode::DOUBLE => DataType::Float64,
        TypeCode::STRING | TypeCode::UNKNOWN => DataType::Utf8,
        TypeCode::BLOB => DataType::Binary,
        TypeCode::TIMESTAMP => DataType::Timestamp(TimeUnit::Nanosecond, Some(UTC.into())),
    }
}

// One typed arrow builder per column.
enum ColumnBuilder {
    Bool(BooleanBuilder),
    Byte(Int8Builder),
    Short(Int16Builder),
    Integer(Int32Builder),
    Long(Int64Builder),
    Float(Float32Builder),
    Double(Float64Builder),
    String(StringBuilder),
    Binary(BinaryBuilder),
    Timestamp(TimestampNanosecondBuilder),
}

impl ColumnBuilder {
    fn for_column(cd: &ColumnDescriptor, capacity: usize) -> Self {
        match cd.type_code() {
            TypeCode::BOOL => Self::Bool(BooleanBuilder::with_capacity(capacity)),
            TypeCode::BYTE => Self::Byte(Int8Builder::with_capacity(capacity)),
            TypeCode::SHORT => Self::Short(Int16Builder::with_capacity(capacity)),
            TypeCode::INTEGER => Self::Integer(Int32Builder::with_capacity(capacity)),
            TypeCode::LONG => Self::Long(Int64Builder::with_capacity(capacity)),
            TypeCode::FLOAT => Self::Float(Float32Builder::with_capacity(capacity)),
            TypeCode::DOUBLE => Self::Double(Float64Builder::with_capacity(capacity)),
            TypeCode::STRING | TypeCode::UNKNOWN => Self::String(StringBuilder::new()),
            TypeCode::BLOB => Self::Binary(BinaryBuilder::new()),
            TypeCode::TIMESTAMP => Self::Timestamp(
                TimestampNanosecondBuilder::with_capacity(capacity).with_timezone(UTC),
            ),
        }
    }

    fn append_null(&mut self) {
        match self {
            Self::Bool(b) => b.append_null(),
            Self::Byte(b) => b.append_null(),
            Self::Short(b) => b.append_null(),
            Self::Integer(b) => b.append_null(),
            Self::Long(b) => b.append_null(),
            Self::Float(b) => b.append_null(),
            Self::Double(b) => b.append_null(),
            Self::String(b) => b.append_null(),
            Self::Binary(b) => b.append_null(),
            Self::Timestamp(b) => b.append_null(),
        }
    }

    fn append(&mut self, value: DriverValue) -> GsResult<()> {
        match (self, value) {
            (builder, DriverValue::Null) => builder.append_null(),
            (Self::Bool(b), DriverValue::Bool(v)) => b.append_value(v),
            (Self::Byte(b), DriverValue::Byte(v)) => b.append_value(v),
            (Self::Short(b), DriverValue::Short(v)) => b.append_value(v),
            (Self::Integer(b), DriverValue::Integer(v)) => b.append_value(v),
            (Self::Long(b), DriverValue::Long(v)) => b.append_value(v),
            (Self::Float(b), DriverValue::Float(v)) => b.append_value(v),
            (Self::Double(b), DriverValue::Double(v)) => b.append_value(v),
            (Self::Binary(b), DriverValue::Bytes(v)) => b.append_value(v),
            (Self::Binary(b), DriverValue::Blob(v)) => b.append_value(v.into_bytes()),
            (Self::Timestamp(b), DriverValue::Timestamp(v)) => {
                let nanos = v.to_timestamp()?.unix_timestamp_nanos();
                b.append_value(i64::try_from(nanos).map_err(|_| {
                    GsError::Conversion(format!(
                        "timestamp {nanos} ns exceeds the range of the columnar export"
                    ))
                })?);
            }
            (Self::String(b), DriverValue::String(v)) => b.append_value(v),
            (Self::String(b), other) => b.append_value(other.to_string()),
            (_, other) => {
                return Err(GsError::Conversion(format!(
                    "value {other} does not fit the column type"
                )))
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            Self::Bool(b) => Arc::new(b.finish()),
            Self::Byte(b) => Arc::new(b.finish()),
            Self::Short(b) => Arc::new(b.finish()),
            Self::Integer(b) => Arc::new(b.finish()),
            Self::Long(b) => Arc::new(b.finish()),
            Self::Float(b) => Arc::new(b.finish()),
            Self::Double(b) => Arc::new(b.finish()),
            Self::String(b) => Arc::new(b.finish()),
            Self::Binary(b) => Arc::new(b.finish()),
            Self::Timestamp(b) => Arc::new(b.finish()),
        }
    }
}

// Collects rows into column builders until a batch is complete.
struct BatchBuilder {
    schema: SchemaRef,
    num_rows: usize,
    columns: Vec<ColumnBuilder>,
}

impl BatchBuilder {
    fn new(metadata: &ResultSetMetadata, schema: SchemaRef, capacity: usize) -> Self {
        Self {
            schema,
            num_rows: 0,
            columns: metadata
                .iter()
                .map(|cd| ColumnBuilder::for_column(cd, capacity))
                .collect(),
        }
    }

    fn push_row(&mut self, values: Vec<DriverValue>) -> GsResult<()> {
        if values.len() != self.columns.len() {
            return Err(impl_err!(
                "row has {} values, but the result set has {} columns",
                values.len(),
                self.columns.len()
            ));
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.append(value)?;
        }
        self.num_rows += 1;
        Ok(())
    }

    fn finish(mut self) -> GsResult<RecordBatch> {
        let arrays: Vec<ArrayRef> = self.columns.iter_mut().map(ColumnBuilder::finish).collect();
        Ok(RecordBatch::try_new(self.schema, arrays)?)
    }
}

/// Iterator over the arrow [`RecordBatch`]es of a result set,
/// see [`Cursor::columnar_batches`](crate::Cursor::columnar_batches).
///
/// Iteration stops at the first empty batch, and after the first error.
#[derive(Debug)]
pub struct ColumnarBatches<'a> {
    core: &'a ConnectionCore,
    result_set: &'a mut ResultSet,
    schema: SchemaRef,
    target_size: usize,
    done: bool,
}

impl<'a> ColumnarBatches<'a> {
    pub(crate) fn new(
        core: &'a ConnectionCore,
        result_set: &'a mut ResultSet,
        target_size: usize,
    ) -> Self {
        let schema = Arc::new(arrow_schema(&result_set.metadata()));
        Self {
            core,
            result_set,
            schema,
            target_size,
            done: false,
        }
    }

    /// The schema shared by all batches.
    pub fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    fn next_batch(&mut self) -> GsResult<RecordBatch> {
        self.core.ensure_open()?;
        let metadata = self.result_set.metadata();
        let mut batch = BatchBuilder::new(&metadata, self.schema(), self.target_size);
        while batch.num_rows < self.target_size {
            match self.result_set.next_driver_row()? {
                Some(values) => batch.push_row(values)?,
                None => break,
            }
        }
        self.core.add_fetched_rows(batch.num_rows)?;
        trace!("ColumnarBatches: produced a batch with {} rows", batch.num_rows);
        batch.finish()
    }
}

impl<'a> Iterator for ColumnarBatches<'a> {
    type Item = GsResult<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_batch() {
            Ok(batch) if batch.num_rows() == 0 => {
                self.done = true;
                None
            }
            Ok(batch) => Some(Ok(batch)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
