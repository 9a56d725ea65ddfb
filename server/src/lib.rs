//! TaskHub server library
//!
//! Configuration loading, logging setup and application wiring for the
//! `taskhub` binary. Exposed as a library so the wiring can be tested.

pub mod config;
pub mod setup;
pub mod telemetry;

pub use config::{CliOverrides, Config};
pub use setup::{
    connect_with_retry, create_repository, create_service, ensure_database_directory,
    initialize_app, router_options, shutdown_signal,
};
pub use telemetry::init_telemetry;
