use crate::{
    conn::ConnectionCore,
    driver::{DriverResultSet, DriverValue},
    GsResult, ResultSetMetadata, Row,
};
use std::sync::Arc;

// The result set that is bound to a cursor.
//
// Rows are read one by one from the driver; values are converted with the
// connection's converter table when a row is handed out.
#[derive(Debug)]
pub(crate) struct ResultSet {
    driver_rs: Box<dyn DriverResultSet>,
    metadata: Arc<ResultSetMetadata>,
    exhausted: bool,
}

impl ResultSet {
    pub(crate) fn new(driver_rs: Box<dyn DriverResultSet>) -> Self {
        let metadata = Arc::new(ResultSetMetadata::new(driver_rs.columns().to_vec()));
        trace!("ResultSet::new() with {} columns", metadata.len());
        Self {
            driver_rs,
            metadata,
            exhausted: false,
        }
    }

    pub(crate) fn metadata(&self) -> Arc<ResultSetMetadata> {
        Arc::clone(&self.metadata)
    }

    // Reads the next row without conversion.
    pub(crate) fn next_driver_row(&mut self) -> GsResult<Option<Vec<DriverValue>>> {
        if self.exhausted {
            return Ok(None);
        }
        match self.driver_rs.next_row()? {
            Some(values) => Ok(Some(values)),
            None => {
                trace!("ResultSet is exhausted");
                self.exhausted = true;
                self.driver_rs.close();
                Ok(None)
            }
        }
    }

    pub(crate) fn next_row(&mut self, core: &ConnectionCore) -> GsResult<Option<Row>> {
        match self.next_driver_row()? {
            Some(values) => {
                core.add_fetched_rows(1)?;
                Ok(Some(Row::new(self.metadata(), core.convert_values(values)?)))
            }
            None => Ok(None),
        }
    }

    pub(crate) fn close(&mut self) {
        if !self.exhausted {
            self.exhausted = true;
            self.driver_rs.close();
        }
    }
}

impl Drop for ResultSet {
    fn drop(&mut self) {
        self.close();
    }
}
