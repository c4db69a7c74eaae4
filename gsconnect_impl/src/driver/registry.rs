use crate::{
    driver::{loopback::LoopbackDriver, Driver},
    url, GsError, GsResult,
};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

lazy_static! {
    static ref DRIVERS: RwLock<HashMap<String, Arc<dyn Driver>>> = {
        let mut drivers: HashMap<String, Arc<dyn Driver>> = HashMap::new();
        drivers.insert(
            url::LOOPBACK.to_string(),
            Arc::new(LoopbackDriver::default()),
        );
        RwLock::new(drivers)
    };
}

/// Registers a driver for the given URL scheme, and returns the driver that was
/// registered for this scheme before, if any.
///
/// Schemes are compared case-insensitively.
///
/// # Errors
///
/// `GsError::Poison` if the registry is poisoned.
pub fn register_driver<S: AsRef<str>>(
    scheme: S,
    driver: Arc<dyn Driver>,
) -> GsResult<Option<Arc<dyn Driver>>> {
    let scheme = scheme.as_ref().to_ascii_lowercase();
    info!("registering driver {} for scheme {scheme}", driver.name());
    Ok(DRIVERS.write()?.insert(scheme, driver))
}

/// Removes the driver for the given URL scheme.
///
/// # Errors
///
/// `GsError::Poison` if the registry is poisoned.
pub fn deregister_driver<S: AsRef<str>>(scheme: S) -> GsResult<Option<Arc<dyn Driver>>> {
    let scheme = scheme.as_ref().to_ascii_lowercase();
    info!("deregistering driver for scheme {scheme}");
    Ok(DRIVERS.write()?.remove(&scheme))
}

/// Returns the schemes for which a driver is registered, sorted.
///
/// # Errors
///
/// `GsError::Poison` if the registry is poisoned.
pub fn registered_schemes() -> GsResult<Vec<String>> {
    let mut schemes: Vec<String> = DRIVERS.read()?.keys().cloned().collect();
    schemes.sort();
    Ok(schemes)
}

pub(crate) fn driver_for(scheme: &str) -> GsResult<Arc<dyn Driver>> {
    DRIVERS
        .read()?
        .get(&scheme.to_ascii_lowercase())
        .cloned()
        .ok_or_else(|| GsError::connection(Box::new(DriverNotFound(scheme.to_string()))))
}

#[derive(Debug, thiserror::Error)]
#[error("driver cannot be loaded: no driver registered for scheme '{0}'")]
struct DriverNotFound(String);
