// docu is written at re-exports of the frontend crate (gsconnect/lib.rs)
#[derive(Debug, Clone)]
pub struct ConnectionConfiguration {
    array_size: usize,
    columnar_batch_size: usize,
}

impl Default for ConnectionConfiguration {
    fn default() -> Self {
        Self {
            array_size: Self::DEFAULT_ARRAY_SIZE,
            columnar_batch_size: Self::DEFAULT_COLUMNAR_BATCH_SIZE,
        }
    }
}
impl ConnectionConfiguration {
    /// Default value for the number of rows that `Cursor::fetch_many(None)` returns.
    ///
    /// Each cursor starts with the connection's value, and can change it with
    /// `Cursor::set_array_size()`.
    pub const DEFAULT_ARRAY_SIZE: usize = crate::dbapi::DEFAULT_ARRAY_SIZE;

    /// Default value for the maximal number of rows in a batch of the columnar export.
    pub const DEFAULT_COLUMNAR_BATCH_SIZE: usize = crate::dbapi::DEFAULT_COLUMNAR_BATCH_SIZE;

    /// Returns the array size that new cursors start with.
    pub fn array_size(&self) -> usize {
        self.array_size
    }
    /// Sets the array size that new cursors start with.
    pub fn set_array_size(&mut self, array_size: usize) {
        self.array_size = array_size;
    }
    /// Builder-method for setting the array size that new cursors start with.
    #[must_use]
    pub fn with_array_size(mut self, array_size: usize) -> Self {
        self.array_size = array_size;
        self
    }

    /// Returns the default target size of columnar batches.
    pub fn columnar_batch_size(&self) -> usize {
        self.columnar_batch_size
    }
    /// Sets the default target size of columnar batches.
    pub fn set_columnar_batch_size(&mut self, columnar_batch_size: usize) {
        self.columnar_batch_size = columnar_batch_size;
    }
    /// Builder-method for setting the default target size of columnar batches.
    #[must_use]
    pub fn with_columnar_batch_size(mut self, columnar_batch_size: usize) -> Self {
        self.columnar_batch_size = columnar_batch_size;
        self
    }
}
