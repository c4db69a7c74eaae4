use crate::{
    conn::{ConnectParams, ConnectionConfiguration, ConnectionStatistics},
    convert::{Adapter, AdapterTable, Converter, ConverterTable, HostType},
    driver::{Driver, DriverOutcome, DriverSession, DriverType, DriverValue},
    GsError, GsResult, GsValue, TypeInfo,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, RwLock,
    },
    time::{Duration, Instant},
};

// The state behind a `Connection` and all its `Cursor`s.
//
// Calls into the session are not serialized here; the session is responsible
// for its own thread safety.
#[derive(Debug)]
pub(crate) struct ConnectionCore {
    session: Box<dyn DriverSession>,
    driver_name: String,
    connect_params: ConnectParams,
    closed: AtomicBool,
    config: RwLock<ConnectionConfiguration>,
    statistics: Mutex<ConnectionStatistics>,
    converters: RwLock<ConverterTable>,
    adapters: RwLock<AdapterTable>,
}

impl ConnectionCore {
    pub(crate) fn try_new(
        driver: &dyn Driver,
        connect_params: ConnectParams,
        config: &ConnectionConfiguration,
    ) -> GsResult<Self> {
        let start = Instant::now();
        let session = driver
            .connect(&connect_params)
            .map_err(|e| GsError::connection(Box::new(e)))?;
        debug!(
            "session to {} opened with driver {} in {:?}",
            connect_params,
            driver.name(),
            start.elapsed()
        );
        Ok(Self {
            session,
            driver_name: driver.name().to_string(),
            connect_params,
            closed: AtomicBool::new(false),
            config: RwLock::new(config.clone()),
            statistics: Mutex::new(ConnectionStatistics::new()),
            converters: RwLock::new(ConverterTable::default()),
            adapters: RwLock::new(AdapterTable::default()),
        })
    }

    pub(crate) fn connect_params(&self) -> &ConnectParams {
        &self.connect_params
    }

    pub(crate) fn driver_name(&self) -> &str {
        &self.driver_name
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_open(&self) -> GsResult<()> {
        if self.is_closed() {
            Err(GsError::ClosedResource("Connection"))
        } else {
            Ok(())
        }
    }

    pub(crate) fn close(&self) -> GsResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            trace!("connection to {} is already closed", self.connect_params);
            Ok(())
        } else {
            debug!("closing connection to {}", self.connect_params);
            Ok(self.session.close()?)
        }
    }

    // Binds the parameters with the adapter table and sends the statement to the session.
    pub(crate) fn execute(&self, sql: &str, parameters: &[GsValue]) -> GsResult<DriverOutcome> {
        self.ensure_open()?;
        // adapters run on a snapshot, they may use this connection themselves
        let adapters = self.adapters.read()?.clone();
        let driver_values = adapters.adapt_all(parameters)?;
        let start = Instant::now();
        let result = self.session.execute(sql, &driver_values);
        self.statistics.lock()?.add_call(start.elapsed());
        Ok(result?)
    }

    pub(crate) fn convert_values(&self, values: Vec<DriverValue>) -> GsResult<Vec<GsValue>> {
        let converters = self.converters.read()?.clone();
        values.into_iter().map(|v| converters.convert(v)).collect()
    }

    pub(crate) fn add_fetched_rows(&self, count: usize) -> GsResult<()> {
        self.statistics.lock()?.add_fetched_rows(count);
        Ok(())
    }

    pub(crate) fn type_info(&self) -> GsResult<Vec<TypeInfo>> {
        self.ensure_open()?;
        Ok(self.session.type_info()?)
    }

    pub(crate) fn is_valid(&self, timeout: Duration) -> bool {
        !self.is_closed() && self.session.is_valid(timeout)
    }

    pub(crate) fn configuration(&self) -> GsResult<ConnectionConfiguration> {
        Ok(self.config.read()?.clone())
    }

    pub(crate) fn update_configuration<F>(&self, f: F) -> GsResult<()>
    where
        F: FnOnce(&mut ConnectionConfiguration),
    {
        f(&mut *self.config.write()?);
        Ok(())
    }

    pub(crate) fn statistics(&self) -> GsResult<ConnectionStatistics> {
        Ok(self.statistics.lock()?.clone())
    }

    pub(crate) fn reset_statistics(&self) -> GsResult<()> {
        self.statistics.lock()?.reset();
        Ok(())
    }

    pub(crate) fn set_converter(
        &self,
        driver_type: DriverType,
        converter: Converter,
    ) -> GsResult<Option<Converter>> {
        Ok(self.converters.write()?.set(driver_type, converter))
    }

    pub(crate) fn remove_converter(&self, driver_type: DriverType) -> GsResult<Option<Converter>> {
        Ok(self.converters.write()?.remove(driver_type))
    }

    pub(crate) fn reset_converters(&self) -> GsResult<()> {
        *self.converters.write()? = ConverterTable::default();
        Ok(())
    }

    pub(crate) fn set_adapter(
        &self,
        host_type: HostType,
        adapter: Adapter,
    ) -> GsResult<Option<Adapter>> {
        Ok(self.adapters.write()?.set(host_type, adapter))
    }

    pub(crate) fn remove_adapter(&self, host_type: HostType) -> GsResult<Option<Adapter>> {
        Ok(self.adapters.write()?.remove(host_type))
    }

    pub(crate) fn reset_adapters(&self) -> GsResult<()> {
        *self.adapters.write()? = AdapterTable::default();
        Ok(())
    }
}

impl Drop for ConnectionCore {
    fn drop(&mut self) {
        if !self.is_closed() {
            trace!("Drop of ConnectionCore: closing the session");
            if let Err(e) = self.close() {
                warn!("closing the session on drop failed with {}", e);
            }
        }
    }
}
