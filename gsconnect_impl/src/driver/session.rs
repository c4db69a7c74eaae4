use crate::{
    driver::{DriverError, DriverValue},
    ColumnDescriptor, ConnectParams, TypeInfo,
};
use std::time::Duration;

/// A driver that can open sessions to a cluster.
///
/// Drivers are registered per URL scheme with
/// [`register_driver`](crate::driver::register_driver), or passed directly to
/// [`Connection::with_driver`](crate::Connection::with_driver).
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// A short name, for logging.
    fn name(&self) -> &str;

    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// `DriverError` if the target is unreachable or rejects the credentials.
    fn connect(&self, params: &ConnectParams) -> Result<Box<dyn DriverSession>, DriverError>;
}

/// One open session of a driver.
///
/// The client does not serialize calls into a session;
/// implementations must be safe to use from several threads at once.
pub trait DriverSession: Send + Sync + std::fmt::Debug {
    /// Executes a statement with the given, already bound, parameters.
    ///
    /// # Errors
    ///
    /// `DriverError` if the statement cannot be executed.
    fn execute(&self, sql: &str, parameters: &[DriverValue]) -> Result<DriverOutcome, DriverError>;

    /// The column types this session supports.
    ///
    /// # Errors
    ///
    /// `DriverError` if the metadata cannot be retrieved.
    fn type_info(&self) -> Result<Vec<TypeInfo>, DriverError>;

    /// Checks whether the session is still usable.
    fn is_valid(&self, timeout: Duration) -> bool;

    /// Releases the session; further calls fail.
    ///
    /// # Errors
    ///
    /// `DriverError` if the release fails.
    fn close(&self) -> Result<(), DriverError>;
}

/// A forward-only result set, produced by a query.
pub trait DriverResultSet: Send + std::fmt::Debug {
    /// Describes the columns.
    fn columns(&self) -> &[ColumnDescriptor];

    /// Returns the next row, or `None` if the result set is exhausted.
    ///
    /// # Errors
    ///
    /// `DriverError` if the row cannot be read, e.g. because the result set was closed.
    fn next_row(&mut self) -> Result<Option<Vec<DriverValue>>, DriverError>;

    /// Releases the result set.
    fn close(&mut self);
}

/// What the execution of a statement produced.
#[derive(Debug)]
pub enum DriverOutcome {
    /// A query result.
    ResultSet(Box<dyn DriverResultSet>),
    /// The number of affected rows; -1 if unknown.
    RowCount(i64),
}
