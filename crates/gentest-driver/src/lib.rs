//! gentest driver: lays fixtures out in a browser (or replays recorded
//! layouts) and writes one signed test file per backend.

pub mod chrome;
pub mod config;
pub mod document;
pub mod driver;
pub mod host;
pub mod output;

pub use config::{DriverConfig, HostChoice};
pub use driver::{Diagnostic, Driver, DriverError, RunSummary};
pub use host::{ExecutionHost, HostError, ReplayHost};
pub use output::OutputLayout;
