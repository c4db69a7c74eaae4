use crate::{GsResult, ResultSetMetadata, Row};
use serde_db::de::DeserializableResultSet;
use std::sync::Arc;

/// The remaining rows of a result set, fully fetched.
///
/// Serde works on complete data, so all rows are fetched before deserialization starts.
#[derive(Debug)]
pub struct Rows {
    pub(crate) metadata: Arc<ResultSetMetadata>,
    pub(crate) number_of_rows: usize,
    pub(crate) row_iter: <Vec<Row> as IntoIterator>::IntoIter,
}

impl Rows {
    pub(crate) fn new(metadata: Arc<ResultSetMetadata>, rows: Vec<Row>) -> Self {
        Self {
            metadata,
            number_of_rows: rows.len(),
            row_iter: rows.into_iter(),
        }
    }

    /// Translates the rows into a rust type.
    ///
    /// Sequences take one element per row; any other target needs exactly one row.
    /// A result set with a single column can be deserialized into a `Vec` of plain values,
    /// a single value into a plain value.
    ///
    /// # Errors
    ///
    /// `GsError::Deserialization` if the rows do not fit the target type.
    pub fn try_into<'de, T>(self) -> GsResult<T>
    where
        T: serde::de::Deserialize<'de>,
    {
        trace!("Rows::try_into()");
        DeserializableResultSet::try_into(self)
    }

    /// The number of rows, as they were fetched.
    pub fn number_of_rows(&self) -> usize {
        self.number_of_rows
    }

    /// The metadata of the result set the rows come from.
    pub fn metadata(&self) -> &ResultSetMetadata {
        &self.metadata
    }

    pub(crate) fn has_multiple_rows(&self) -> bool {
        self.row_iter.len() > 1
    }
}

impl Iterator for Rows {
    type Item = Row;
    fn next(&mut self) -> Option<Row> {
        self.row_iter.next()
    }
}
