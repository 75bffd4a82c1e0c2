use std::collections::HashMap;
use std::net::IpAddr;

use netcheck_common::error::ProbeErrorKind;
use netcheck_common::network::device::{Device, NetworkInterface};
use netcheck_common::network::probe::{ProbeKey, ProbeKind, ProbeOutcome};
use netcheck_common::network::report::{DeviceReport, ProbeReport};
use tracing::warn;

/// Folds per-address outcomes back into the configured device order.
///
/// Devices and interfaces keep the order of `devices`, no matter in which
/// order the probes completed. An interface without an outcome is reported as
/// [`ProbeErrorKind::NotProbed`].
pub fn aggregate(devices: &[Device], outcomes: &HashMap<IpAddr, ProbeOutcome>) -> ProbeReport {
    fold(devices, |nic| outcomes.get(&nic.address))
}

/// Same as [`aggregate`] for outcomes keyed by address and strategy.
///
/// Each interface picks the outcome of its own strategy, which is its
/// override or `default`.
pub fn aggregate_keyed(
    devices: &[Device],
    default: ProbeKind,
    outcomes: &HashMap<ProbeKey, ProbeOutcome>,
) -> ProbeReport {
    fold(devices, |nic| outcomes.get(&(nic.address, nic.strategy_or(default))))
}

fn fold<'a, F>(devices: &[Device], lookup: F) -> ProbeReport
where
    F: Fn(&NetworkInterface) -> Option<&'a ProbeOutcome>,
{
    let entries: Vec<DeviceReport> = devices
        .iter()
        .map(|device| {
            let per_interface: Vec<ProbeOutcome> = device
                .interfaces
                .iter()
                .map(|nic| match lookup(nic) {
                    Some(outcome) => outcome.clone(),
                    None => {
                        warn!(device = %device.name, interface = %nic.name, "no outcome for {}", nic.address);
                        ProbeOutcome::down(nic.address, ProbeErrorKind::NotProbed)
                    }
                })
                .collect();
            DeviceReport::new(device.clone(), per_interface)
        })
        .collect();

    ProbeReport::new(entries)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
