//! The interface to the driver that executes the statements, and the built-in drivers.
//!
//! A driver is chosen by the scheme of the connection URL; drivers for further schemes
//! can be added with [`register_driver`].

mod driver_error;
mod driver_value;
pub(crate) mod loopback;
pub(crate) mod registry;
mod session;

pub use {
    driver_error::DriverError,
    driver_value::{Blob, DriverTimestamp, DriverType, DriverValue},
    loopback::LoopbackDriver,
    registry::{deregister_driver, register_driver, registered_schemes},
    session::{Driver, DriverOutcome, DriverResultSet, DriverSession},
};
