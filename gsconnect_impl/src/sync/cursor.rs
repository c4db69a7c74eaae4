use super::{columnar::ColumnarBatches, result_set::ResultSet, Connection};
use crate::{
    base::count_placeholders, conn::ConnectionCore, dbapi::DbCursor,
    driver::DriverOutcome, GsError, GsResult, GsValue, ParameterDescriptor, ResultSetMetadata,
    Row, Rows,
};
use std::sync::Arc;

/// The execution context of a statement, and the result set it produced.
///
/// A `Cursor` is created with [`Connection::cursor`](crate::Connection::cursor).
/// Each call of [`execute`](Cursor::execute) replaces the result set of the previous call.
///
/// `Cursor` implements `std::iter::Iterator` over the rows of the active result set;
/// since fetching can fail, the Iterator-Item is `GsResult<Row>`.
///
/// ```rust,no_run
/// # use gsconnect::{Connection, GsResult};
/// # fn main() -> GsResult<()> {
/// # let connection = Connection::new("loopback://localhost:10001/c1?user=u&password=p")?;
/// let mut cursor = connection.cursor()?;
/// cursor.execute("SELECT * FROM Sample WHERE id > ?", &[2.into()])?;
/// for row in &mut cursor {
///     let (id, value): (i32, String) = row?.try_into()?;
///     println!("{id}: {value}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Cursor {
    core: Arc<ConnectionCore>,
    result_set: Option<ResultSet>,
    parameters: Vec<ParameterDescriptor>,
    row_count: i64,
    array_size: usize,
    columnar_batch_size: usize,
    closed: bool,
}

impl Cursor {
    pub(crate) fn new(core: Arc<ConnectionCore>) -> GsResult<Self> {
        let config = core.configuration()?;
        Ok(Self {
            core,
            result_set: None,
            parameters: Vec::new(),
            row_count: -1,
            array_size: config.array_size(),
            columnar_batch_size: config.columnar_batch_size(),
            closed: false,
        })
    }

    fn ensure_usable(&self) -> GsResult<()> {
        if self.closed {
            return Err(GsError::ClosedResource("Cursor"));
        }
        self.core.ensure_open()
    }

    fn close_result_set(&mut self) {
        if let Some(mut rs) = self.result_set.take() {
            trace!("closing the previous result set");
            rs.close();
        }
    }

    /// Executes a statement.
    ///
    /// The `parameters` are bound in order to the `?` markers of the statement text;
    /// use an empty slice for statements without markers.
    /// A previously active result set of this cursor is closed.
    ///
    /// # Errors
    ///
    /// `GsError::ParameterCount` if the number of parameters differs from the number of markers.
    ///
    /// `GsError::ClosedResource` if the cursor or its connection is closed.
    ///
    /// `GsError::DbError` if the driver rejects the statement.
    pub fn execute(&mut self, sql: &str, parameters: &[GsValue]) -> GsResult<&mut Self> {
        self.ensure_usable()?;
        self.close_result_set();
        self.row_count = -1;
        self.parameters = check_parameter_count(sql, parameters.len())?;

        debug!("Cursor::execute({sql}) with {} parameters", parameters.len());
        match self.core.execute(sql, parameters)? {
            DriverOutcome::ResultSet(driver_rs) => {
                self.result_set = Some(ResultSet::new(driver_rs));
            }
            DriverOutcome::RowCount(count) => {
                self.row_count = count;
            }
        }
        Ok(self)
    }

    /// Executes a statement once for each of the parameter sets, in the given order.
    ///
    /// The row count afterwards is the total of all executions, or -1 if any execution
    /// could not report its count, or if no parameter set was given.
    ///
    /// The executions are not atomic: if one of them fails, the effects of the earlier ones
    /// remain as the driver left them.
    ///
    /// # Errors
    ///
    /// `GsError::ParameterCount` if a parameter set does not match the number of markers;
    /// the sets before it are executed.
    ///
    /// `GsError::Usage` if the statement produces a result set.
    ///
    /// Errors of [`execute`](Cursor::execute).
    pub fn execute_many<I, P>(&mut self, sql: &str, parameter_sets: I) -> GsResult<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[GsValue]>,
    {
        self.ensure_usable()?;
        self.close_result_set();
        self.row_count = -1;

        let mut executions = 0_usize;
        let mut total: Option<i64> = Some(0);
        for parameters in parameter_sets {
            let parameters = parameters.as_ref();
            self.parameters = check_parameter_count(sql, parameters.len())?;
            match self.core.execute(sql, parameters)? {
                DriverOutcome::ResultSet(mut driver_rs) => {
                    driver_rs.close();
                    return Err(GsError::Usage(
                        "execute_many() cannot be used with statements that return a result set",
                    ));
                }
                DriverOutcome::RowCount(count) => total = add_row_count(total, count),
            }
            executions += 1;
        }
        debug!("Cursor::execute_many({sql}) executed {executions} parameter sets");
        if executions > 0 {
            self.row_count = total.unwrap_or(-1);
        }
        Ok(self)
    }

    /// Returns the next row of the active result set, or `None` if it is exhausted.
    ///
    /// # Errors
    ///
    /// `GsError::NoResultSet` if the last statement did not produce a result set.
    pub fn fetch_one(&mut self) -> GsResult<Option<Row>> {
        self.ensure_usable()?;
        trace!("Cursor::fetch_one()");
        self.result_set
            .as_mut()
            .ok_or(GsError::NoResultSet)?
            .next_row(&self.core)
    }

    /// Returns up to `size` rows, or up to [`array_size`](Cursor::array_size) rows if
    /// `size` is `None`. Fewer rows are returned if the result set is exhausted.
    ///
    /// # Errors
    ///
    /// `GsError::NoResultSet` if the last statement did not produce a result set.
    pub fn fetch_many(&mut self, size: Option<usize>) -> GsResult<Vec<Row>> {
        self.ensure_usable()?;
        let size = size.unwrap_or(self.array_size);
        trace!("Cursor::fetch_many({size})");
        let rs = self.result_set.as_mut().ok_or(GsError::NoResultSet)?;
        let mut rows = Vec::with_capacity(size.min(1024));
        while rows.len() < size {
            match rs.next_row(&self.core)? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    /// Returns all remaining rows of the active result set.
    ///
    /// # Errors
    ///
    /// `GsError::NoResultSet` if the last statement did not produce a result set.
    pub fn fetch_all(&mut self) -> GsResult<Vec<Row>> {
        self.ensure_usable()?;
        trace!("Cursor::fetch_all()");
        let rs = self.result_set.as_mut().ok_or(GsError::NoResultSet)?;
        let mut rows = Vec::new();
        while let Some(row) = rs.next_row(&self.core)? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Conveniently translates the remaining rows of the active result set into a rust type
    /// that implements `serde::Deserialize` and has an adequate structure.
    ///
    /// The cursor is consumed; [`Connection::query`](crate::Connection::query) returns
    /// a cursor that fits this method.
    ///
    /// * A `Vec<line_struct>` takes one element per row; the elements of `line_struct`
    ///   are matched by column name (structs) or by position (tuples).
    ///
    /// * If the result set contains only a single column, a `Vec<plain_field>` works as well.
    ///
    /// * If the result set contains exactly one row, you can also deserialize directly
    ///   into a `line_struct`, and if it has only a single column, into a plain value.
    ///
    /// The implementation uses [`serde_db::de`](https://docs.rs/serde_db/latest/serde_db/de/index.html).
    ///
    /// ```rust,no_run
    /// # use gsconnect::{Connection, GsResult};
    /// # use serde::Deserialize;
    /// # fn main() -> GsResult<()> {
    /// # let connection = Connection::new("loopback://localhost:10001/c1?user=u&password=p")?;
    /// #[derive(Deserialize)]
    /// struct Sample {
    ///     id: i32,
    ///     value: String,
    /// }
    /// let samples: Vec<Sample> = connection.query("SELECT * FROM Sample")?.try_into()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// `GsError::NoResultSet` if the last statement did not produce a result set.
    ///
    /// `GsError::Deserialization` if the deserialization into the target type is not possible.
    pub fn try_into<'de, T>(self) -> GsResult<T>
    where
        T: serde::de::Deserialize<'de>,
    {
        trace!("Cursor::try_into()");
        self.into_rows()?.try_into()
    }

    /// Fetches the remaining rows of the active result set.
    ///
    /// # Errors
    ///
    /// `GsError::NoResultSet` if the last statement did not produce a result set.
    pub fn into_rows(mut self) -> GsResult<Rows> {
        let rows = self.fetch_all()?;
        let metadata = self.description().ok_or(GsError::NoResultSet)?;
        Ok(Rows::new(metadata, rows))
    }

    /// Drains the active result set as arrow [`RecordBatch`](arrow::record_batch::RecordBatch)es.
    ///
    /// Each batch holds at most `target_size` rows; `None` uses the connection's
    /// [`columnar_batch_size`](crate::ConnectionConfiguration::columnar_batch_size).
    /// The iteration stops at the first empty batch.
    /// The values are taken as the driver provides them; converters are not applied.
    ///
    /// # Errors
    ///
    /// `GsError::Usage` if `target_size` is 0.
    ///
    /// `GsError::NoResultSet` if the last statement did not produce a result set.
    pub fn columnar_batches(&mut self, target_size: Option<usize>) -> GsResult<ColumnarBatches<'_>> {
        self.ensure_usable()?;
        let target_size = target_size.unwrap_or(self.columnar_batch_size);
        if target_size == 0 {
            return Err(GsError::Usage("the target size of columnar batches must not be 0"));
        }
        let rs = self.result_set.as_mut().ok_or(GsError::NoResultSet)?;
        Ok(ColumnarBatches::new(&self.core, rs, target_size))
    }

    /// The column descriptors of the active result set;
    /// `None` if the last statement did not produce one, or if the cursor is closed.
    pub fn description(&self) -> Option<Arc<ResultSetMetadata>> {
        if self.is_closed() {
            return None;
        }
        self.result_set.as_ref().map(ResultSet::metadata)
    }

    /// The descriptors of the `?` markers of the last executed statement.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Number of rows the last statement affected;
    /// -1 if it was a query, if the driver could not tell, or if the cursor is closed.
    pub fn row_count(&self) -> i64 {
        if self.is_closed() {
            -1
        } else {
            self.row_count
        }
    }

    /// Number of rows that `fetch_many(None)` returns.
    pub fn array_size(&self) -> usize {
        self.array_size
    }

    /// Changes the number of rows that `fetch_many(None)` returns.
    pub fn set_array_size(&mut self, array_size: usize) {
        self.array_size = array_size;
    }

    /// There is never more than one result set; returns `false`.
    ///
    /// # Errors
    ///
    /// `GsError::ClosedResource` if the cursor or its connection is closed.
    pub fn next_set(&mut self) -> GsResult<bool> {
        self.ensure_usable()?;
        Ok(false)
    }

    /// Stored procedures are not supported.
    ///
    /// # Errors
    ///
    /// Always `GsError::Unsupported`.
    pub fn call_proc(&mut self, _procname: &str, _parameters: &[GsValue]) -> GsResult<()> {
        Err(GsError::Unsupported("callproc"))
    }

    /// The id of the last inserted row is not available.
    ///
    /// # Errors
    ///
    /// Always `GsError::Unsupported`.
    pub fn last_row_id(&self) -> GsResult<i64> {
        Err(GsError::Unsupported("lastrowid"))
    }

    /// Returns the connection this cursor was created from.
    pub fn connection(&self) -> Connection {
        Connection::from_core(Arc::clone(&self.core))
    }

    /// Returns true if the cursor or its connection is closed.
    pub fn is_closed(&self) -> bool {
        self.closed || self.core.is_closed()
    }

    /// Closes the active result set and makes the cursor unusable.
    ///
    /// Calling it again has no effect.
    pub fn close(&mut self) -> GsResult<()> {
        if !self.closed {
            trace!("Cursor::close()");
            self.close_result_set();
            self.closed = true;
        }
        Ok(())
    }
}

// unknown counts and overflows make the total unknown
fn add_row_count(total: Option<i64>, count: i64) -> Option<i64> {
    match total {
        Some(t) if count >= 0 => t.checked_add(count),
        _ => None,
    }
}

fn check_parameter_count(sql: &str, given: usize) -> GsResult<Vec<ParameterDescriptor>> {
    let expected = count_placeholders(sql);
    if expected == given {
        Ok((1..=expected).map(ParameterDescriptor::new).collect())
    } else {
        Err(GsError::ParameterCount { expected, given })
    }
}

impl Iterator for Cursor {
    type Item = GsResult<Row>;
    fn next(&mut self) -> Option<GsResult<Row>> {
        match self.fetch_one() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl DbCursor for Cursor {
    fn execute(&mut self, sql: &str, parameters: &[GsValue]) -> GsResult<&mut Self> {
        Cursor::execute(self, sql, parameters)
    }
    fn execute_many(
        &mut self,
        sql: &str,
        parameter_sets: &[Vec<GsValue>],
    ) -> GsResult<&mut Self> {
        Cursor::execute_many(self, sql, parameter_sets)
    }
    fn fetch_one(&mut self) -> GsResult<Option<Row>> {
        Cursor::fetch_one(self)
    }
    fn fetch_many(&mut self, size: Option<usize>) -> GsResult<Vec<Row>> {
        Cursor::fetch_many(self, size)
    }
    fn fetch_all(&mut self) -> GsResult<Vec<Row>> {
        Cursor::fetch_all(self)
    }
    fn description(&self) -> Option<Arc<ResultSetMetadata>> {
        Cursor::description(self)
    }
    fn row_count(&self) -> i64 {
        Cursor::row_count(self)
    }
    fn array_size(&self) -> usize {
        Cursor::array_size(self)
    }
    fn set_array_size(&mut self, array_size: usize) {
        Cursor::set_array_size(self, array_size);
    }
    fn next_set(&mut self) -> GsResult<bool> {
        Cursor::next_set(self)
    }
    fn call_proc(&mut self, procname: &str, parameters: &[GsValue]) -> GsResult<()> {
        Cursor::call_proc(self, procname, parameters)
    }
    fn last_row_id(&self) -> GsResult<i64> {
        Cursor::last_row_id(self)
    }
    fn close(&mut self) -> GsResult<()> {
        Cursor::close(self)
    }
}

#[cfg(test)]
mod test {
    use super::add_row_count;

    #[test]
    fn test_add_row_count() {
        assert_eq!(Some(5), add_row_count(Some(2), 3));
        assert_eq!(None, add_row_count(Some(2), -1));
        assert_eq!(None, add_row_count(None, 3));
        assert_eq!(None, add_row_count(Some(i64::MAX), 1));
    }
}
