//! Connection Pooling with r2d2.

use crate::{
    ConnectParams, Connection, ConnectionConfiguration, GsError, GsResult, IntoConnectParams,
};
use log::trace;
use std::time::Duration;

/// Implementation of r2d2's
/// [`ManageConnection`](https://docs.rs/r2d2/*/r2d2/trait.ManageConnection.html).
///
/// ## Example
///
/// ```rust,no_run
/// use gsconnect::{
///     ConnectionConfiguration, ConnectionManager, IntoConnectParamsBuilder
/// };
///
/// # use gsconnect::GsResult;
/// # fn foo() -> GsResult<()> {
/// let mut builder = "loopback://abcd123:20001/myCluster".into_connect_params_builder()?;
/// builder.user("MEIER").password("schlau");
/// let pool = r2d2::Pool::builder()
///     .max_size(15)
///     .build(ConnectionManager::with_configuration(
///         builder,
///         ConnectionConfiguration::default().with_array_size(100),
///     )?).unwrap();
///
/// let conn = pool.get().unwrap();
/// conn.query("SELECT * FROM Sample")?;
/// # Ok(())}
/// ```
///
#[derive(Debug)]
pub struct ConnectionManager {
    connect_params: ConnectParams,
    connect_config: ConnectionConfiguration,
}
impl ConnectionManager {
    /// Creates a new `ConnectionManager`.
    ///
    /// # Errors
    ///
    /// `GsError::Usage` if not enough or inconsistent information was provided
    pub fn new<P: IntoConnectParams>(p: P) -> GsResult<Self> {
        Ok(Self {
            connect_params: p.into_connect_params()?,
            connect_config: ConnectionConfiguration::default(),
        })
    }
    /// Creates a new `ConnectionManager` with provided configuration.
    ///
    /// # Errors
    ///
    /// `GsError::Usage` if not enough or inconsistent information was provided
    pub fn with_configuration<P: IntoConnectParams>(
        p: P,
        c: ConnectionConfiguration,
    ) -> GsResult<Self> {
        Ok(Self {
            connect_params: p.into_connect_params()?,
            connect_config: c,
        })
    }
}

impl r2d2::ManageConnection for ConnectionManager {
    type Connection = Connection;
    type Error = GsError;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        trace!("ConnectionManager::connect()");
        Connection::with_configuration(&self.connect_params, &self.connect_config)
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        trace!("ConnectionManager::is_valid()");
        if conn.is_valid(self.connect_params.login_timeout().max(Duration::from_secs(1))) {
            Ok(())
        } else {
            Err(GsError::Usage("connection is no longer valid"))
        }
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        trace!("ConnectionManager::has_broken()");
        conn.is_closed()
    }
}
