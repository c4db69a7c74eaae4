use crate::driver::DriverError;
use thiserror::Error;

/// A list specifying categories of [`GsError`](crate::GsError).
///
/// The first five variants correspond to the error kinds of the DB-API contract;
/// the remaining ones cover parameter handling, conversions and misuse.
#[derive(Error, Debug)] //
#[non_exhaustive]
pub enum GsError {
    /// The driver could not be loaded, or the session could not be established.
    #[error("Connection could not be established")]
    Connection {
        /// The causing Error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// An operation was attempted on a closed `Connection` or `Cursor`;
    /// the contained text names the closed resource.
    #[error("{0} is already closed")]
    ClosedResource(&'static str),

    /// The operation is not supported by the target database.
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// The number of bound parameters does not match the number of placeholders.
    #[error("Statement expects {expected} parameter(s), but {given} were given")]
    ParameterCount {
        /// Number of placeholders in the statement text.
        expected: usize,
        /// Number of provided parameters.
        given: usize,
    },

    /// A fetch was attempted while no query result set is active.
    #[error("No result set is active")]
    NoResultSet,

    /// Erroneous Connection Parameters, e.g. from a malformed connection URL.
    #[error("Erroneous Connection Parameters")]
    ConnParams {
        /// The causing Error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The driver reported an error while executing a statement or fetching rows;
    /// the contained `DriverError` describes the concrete reason.
    #[error("Driver reported an error")]
    DbError {
        /// The causing Error.
        #[from]
        source: DriverError,
    },

    /// Deserialization of a `Row`, a sequence of rows, or a single `GsValue`
    /// failed (methods `try_into()`).
    #[error("Error occured in deserialization")]
    Deserialization {
        /// The causing Error.
        #[from]
        source: serde_db::de::DeserializationError,
    },

    /// A date or time component was out of range.
    #[error("Invalid date or time component")]
    DateTime {
        /// The causing Error.
        #[from]
        source: time::error::ComponentRange,
    },

    /// Assembling an arrow record batch of the columnar export failed.
    #[error("Columnar export failed")]
    Arrow {
        /// The causing Error.
        #[from]
        source: arrow::error::ArrowError,
    },

    /// A value could not be converted between its host and its driver representation.
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Implementation error.
    #[error("Implementation error: {}", _0)]
    Impl(&'static str),

    /// Implementation error.
    #[error("Implementation error: {}", _0)]
    ImplDetailed(String),

    /// Error occured in thread synchronization.
    #[error("Error occured in thread synchronization")]
    Poison,

    /// Error caused by wrong usage.
    #[error("Wrong usage: {}", _0)]
    Usage(&'static str),

    /// Error caused by wrong usage.
    #[error("Wrong usage: {}", _0)]
    UsageDetailed(String),
}

/// Abbreviation of `Result<T, GsError>`.
pub type GsResult<T> = std::result::Result<T, GsError>;

impl GsError {
    /// Returns the contained `DriverError`, if any.
    ///
    /// This method helps in case you need programmatic access to e.g. the error code.
    ///
    /// ```rust,no_run
    /// # use gsconnect::{Connection, GsResult};
    /// # fn main() -> GsResult<()> {
    /// # let connection = Connection::new("loopback://localhost:10001/c1?user=u&password=p")?;
    /// let mut cursor = connection.cursor()?;
    /// if let Err(e) = cursor.execute("SELECT * FROM no_such_table", &[]) {
    ///     if let Some(driver_error) = e.driver_error() {
    ///         println!("driver error code: {}", driver_error.code());
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            Self::DbError { source } => Some(source),
            Self::Connection { source } => source.downcast_ref::<DriverError>(),
            _ => None,
        }
    }

    /// Reveal the inner error
    #[must_use]
    pub fn inner(&self) -> Option<&dyn std::error::Error> {
        match self {
            Self::Connection { source } | Self::ConnParams { source } => Some(&**source),
            Self::DbError { source } => Some(source),
            Self::Deserialization { source } => Some(source),
            Self::DateTime { source } => Some(source),
            Self::Arrow { source } => Some(source),
            _ => None,
        }
    }

    /// Returns a decently formed and hopefully helpful error description.
    #[must_use]
    pub fn display_with_inner(&self) -> String {
        if let Some(e) = self.inner() {
            format!("{}, caused by {:?}", &self, e)
        } else {
            format!("{}", &self)
        }
    }

    pub(crate) fn conn_params(error: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self::ConnParams { source: error }
    }

    pub(crate) fn connection(error: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self::Connection { source: error }
    }
}

impl<G> From<std::sync::PoisonError<G>> for GsError {
    fn from(_error: std::sync::PoisonError<G>) -> Self {
        Self::Poison
    }
}

/// Creates a [`GsError::UsageDetailed`](crate::GsError::UsageDetailed) with `format!` arguments.
#[macro_export]
macro_rules! usage_err {
    ($($arg:tt)*) => {
        $crate::GsError::UsageDetailed(format!($($arg)*))
    };
}

/// Creates a [`GsError::ImplDetailed`](crate::GsError::ImplDetailed) with `format!` arguments.
#[macro_export]
macro_rules! impl_err {
    ($($arg:tt)*) => {
        $crate::GsError::ImplDetailed(format!($($arg)*))
    };
}
