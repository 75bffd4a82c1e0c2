//! # netcheck core
//!
//! Host-liveness probing for a list of configured devices.
//!
//! * **[`strategy`]**: how a single address is checked (TCP handshake or ICMP echo).
//! * **[`prober`]**: bounded, cancellable fan-out of probes over many addresses.
//! * **[`aggregator`]**: folds outcomes back into configured device order.
//! * **[`registry`]**: the device list, its JSON form and published snapshots.
//! * **[`monitor`]**: probe cycles, one-off or repeated.

pub mod aggregator;
pub mod monitor;
pub mod prober;
pub mod registry;
pub mod strategy;

pub use monitor::{Monitor, check_device, run_probe_cycle};
