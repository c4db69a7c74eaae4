// The database connection, the parameters for creating one, and its runtime settings.

mod connection_configuration;
mod connection_core;
mod connection_statistics;
mod params;

pub(crate) use connection_core::ConnectionCore;
pub use {
    connection_configuration::ConnectionConfiguration,
    connection_statistics::ConnectionStatistics,
    params::{
        connect_params::{ConnectParams, Credentials},
        connect_params_builder::ConnectParamsBuilder,
        into_connect_params::IntoConnectParams,
        into_connect_params_builder::IntoConnectParamsBuilder,
    },
};
