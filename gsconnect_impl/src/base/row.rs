use crate::{GsError, GsResult, GsValue, ResultSetMetadata};
use serde_db::de::DeserializableRow;
use std::sync::Arc;

/// A single line of a result set, consisting of the contained `GsValue`s and
/// a reference to the metadata.
///
/// `Row` has several methods that support an efficient data transfer into your own data structures.
///
/// You also can access individual values with `row[idx]`, or iterate over the values (with
/// `row.iter()` or `for value in row {...}`).
#[derive(Debug)]
pub struct Row {
    metadata: Arc<ResultSetMetadata>,
    value_iter: <Vec<GsValue> as IntoIterator>::IntoIter,
}

impl Row {
    pub(crate) fn new(metadata: Arc<ResultSetMetadata>, values: Vec<GsValue>) -> Self {
        Self {
            metadata,
            value_iter: values.into_iter(),
        }
    }

    /// Converts the entire Row into a rust value.
    ///
    /// Tuples and tuple structs are filled in column order, structs by column name.
    /// A row with a single column can also be converted into a plain value.
    ///
    /// # Errors
    ///
    /// `GsError::Deserialization` if deserialization into the target type is not possible.
    pub fn try_into<'de, T>(self) -> GsResult<T>
    where
        T: serde::de::Deserialize<'de>,
    {
        trace!("Row::try_into()");
        DeserializableRow::try_into(self)
    }

    /// Removes and returns the next value.
    pub fn next_value(&mut self) -> Option<GsValue> {
        self.value_iter.next()
    }

    /// Conveniently combines `next_value()` and the value's `try_into()`.
    ///
    /// # Errors
    ///
    /// `GsError::Usage` if there is no more element.
    ///
    /// `GsError::Deserialization` if deserialization into the target type is not possible.
    pub fn next_try_into<'de, T>(&mut self) -> GsResult<T>
    where
        T: serde::de::Deserialize<'de>,
    {
        self.next_value()
            .ok_or(GsError::Usage("no more value"))?
            .try_into()
    }

    /// Returns the number of values that were not yet consumed.
    pub fn len(&self) -> usize {
        self.value_iter.len()
    }

    /// Returns true if the row contains no value.
    pub fn is_empty(&self) -> bool {
        self.value_iter.as_slice().is_empty()
    }

    /// Returns the values that were not yet consumed.
    pub fn values(&self) -> &[GsValue] {
        self.value_iter.as_slice()
    }

    /// Iterates over the values that were not yet consumed.
    pub fn iter(&self) -> std::slice::Iter<'_, GsValue> {
        self.value_iter.as_slice().iter()
    }

    /// Converts itself in the single contained value.
    ///
    /// # Errors
    ///
    /// `GsError::Usage` if the row is empty or has more than one value.
    pub fn into_single_value(mut self) -> GsResult<GsValue> {
        if self.len() > 1 {
            Err(GsError::Usage("Row has more than one field"))
        } else {
            self.next_value().ok_or(GsError::Usage("Row is empty"))
        }
    }

    /// Returns the metadata.
    pub fn metadata(&self) -> &ResultSetMetadata {
        &self.metadata
    }
}

/// Support indexing.
impl std::ops::Index<usize> for Row {
    type Output = GsValue;
    fn index(&self, idx: usize) -> &GsValue {
        &self.value_iter.as_slice()[idx]
    }
}

/// Row is an iterator with item `GsValue`.
impl Iterator for Row {
    type Item = GsValue;
    fn next(&mut self) -> Option<GsValue> {
        self.next_value()
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "(")?;
        for (i, v) in self.value_iter.as_slice().iter().enumerate() {
            if i > 0 {
                write!(fmt, ", ")?;
            }
            write!(fmt, "{v}")?;
        }
        write!(fmt, ")")
    }
}
