//! The DB-API capability contract, as implemented by
//! [`Connection`](crate::Connection) and [`Cursor`](crate::Cursor).
//!
//! Code that only needs the standard capabilities can be written against these traits.
//!
//! ```rust,no_run
//! use gsconnect::{dbapi::{DbConnection, DbCursor}, GsResult};
//!
//! fn count_rows<C: DbConnection>(connection: &C, table: &str) -> GsResult<usize> {
//!     let mut cursor = connection.cursor()?;
//!     cursor.execute(&format!("SELECT * FROM {table}"), &[])?;
//!     Ok(cursor.fetch_all()?.len())
//! }
//! ```

use crate::{GsResult, GsValue, ResultSetMetadata, Row};
use std::sync::Arc;

/// The supported DB-API level.
pub const APILEVEL: &str = "2.0";

/// Threads may share the module, connections, and cursors.
pub const THREADSAFETY: u8 = 2;

/// Parameters are bound positionally, to `?` markers.
pub const PARAMSTYLE: &str = "qmark";

/// Number of rows that `fetch_many(None)` returns on a new cursor.
pub const DEFAULT_ARRAY_SIZE: usize = 1;

/// Maximal number of rows in a batch of the columnar export, if no target is given.
pub const DEFAULT_COLUMNAR_BATCH_SIZE: usize = 1024;

/// Connection capability.
pub trait DbConnection {
    /// The cursor type this connection produces.
    type TCursor: DbCursor;

    /// Creates a new cursor.
    ///
    /// Fails with `GsError::ClosedResource` if the connection is closed.
    fn cursor(&self) -> GsResult<Self::TCursor>;

    /// Always fails with `GsError::Unsupported`.
    fn commit(&self) -> GsResult<()>;

    /// Always fails with `GsError::Unsupported`.
    fn rollback(&self) -> GsResult<()>;

    /// Releases the session; calling it again has no effect.
    fn close(&self) -> GsResult<()>;

    /// Always true.
    fn autocommit(&self) -> GsResult<bool>;

    /// Accepted, but without effect.
    fn set_autocommit(&self, autocommit: bool) -> GsResult<()>;
}

/// Cursor capability.
pub trait DbCursor {
    /// Executes a statement, binding `parameters` to the `?` markers in order.
    fn execute(&mut self, sql: &str, parameters: &[GsValue]) -> GsResult<&mut Self>;

    /// Executes a statement once per parameter set, in the given order.
    fn execute_many(&mut self, sql: &str, parameter_sets: &[Vec<GsValue>])
        -> GsResult<&mut Self>;

    /// Returns the next row, or `None` if the result set is exhausted.
    fn fetch_one(&mut self) -> GsResult<Option<Row>>;

    /// Returns up to `size` rows, or up to `array_size` rows if `size` is `None`.
    fn fetch_many(&mut self, size: Option<usize>) -> GsResult<Vec<Row>>;

    /// Returns all remaining rows.
    fn fetch_all(&mut self) -> GsResult<Vec<Row>>;

    /// The column descriptors of the active result set.
    fn description(&self) -> Option<Arc<ResultSetMetadata>>;

    /// Number of affected rows of the last statement, -1 if unknown or if it was a query.
    fn row_count(&self) -> i64;

    /// Number of rows that `fetch_many(None)` returns.
    fn array_size(&self) -> usize;

    /// Changes the number of rows that `fetch_many(None)` returns.
    fn set_array_size(&mut self, array_size: usize);

    /// Always false; there are never further result sets.
    fn next_set(&mut self) -> GsResult<bool>;

    /// Always fails with `GsError::Unsupported`.
    fn call_proc(&mut self, procname: &str, parameters: &[GsValue]) -> GsResult<()>;

    /// Always fails with `GsError::Unsupported`.
    fn last_row_id(&self) -> GsResult<i64>;

    /// Closes the cursor and its result set.
    fn close(&mut self) -> GsResult<()>;
}
