//! Shared vocabulary of the `netcheck` workspace.
//!
//! Everything the prober, the registry and the terminal front end exchange
//! lives here: devices and their interfaces, probe requests and outcomes,
//! the aggregated report and the error kinds attached to failed probes.

pub mod config;
pub mod error;
pub mod log;
pub mod network;

#[doc(hidden)]
pub use tracing as __tracing;
