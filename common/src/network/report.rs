//! # Probe Report
//!
//! The result of one probe cycle, in the order the devices were configured.
//! A report is never patched; the next cycle builds a new one.

use std::net::IpAddr;

use serde::Serialize;

use crate::network::device::Device;
use crate::network::probe::ProbeOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    pub device: Device,
    /// One outcome per interface, in interface order.
    pub outcomes: Vec<ProbeOutcome>,
    pub any_reachable: bool,
}

impl DeviceReport {
    pub fn new(device: Device, outcomes: Vec<ProbeOutcome>) -> Self {
        let any_reachable = outcomes.iter().any(|outcome| outcome.reachable);
        Self {
            device,
            outcomes,
            any_reachable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProbeReport {
    devices: Vec<DeviceReport>,
}

impl ProbeReport {
    pub fn new(devices: Vec<DeviceReport>) -> Self {
        Self { devices }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeviceReport> {
        self.devices.iter()
    }

    /// First device with the given name.
    pub fn device(&self, name: &str) -> Option<&DeviceReport> {
        self.devices.iter().find(|entry| entry.device.name == name)
    }

    pub fn outcome(&self, address: IpAddr) -> Option<&ProbeOutcome> {
        self.devices
            .iter()
            .flat_map(|entry| entry.outcomes.iter())
            .find(|outcome| outcome.target == address)
    }

    /// Number of devices with at least one reachable interface.
    pub fn reachable_devices(&self) -> usize {
        self.devices.iter().filter(|entry| entry.any_reachable).count()
    }
}

impl<'a> IntoIterator for &'a ProbeReport {
    type Item = &'a DeviceReport;
    type IntoIter = std::slice::Iter<'a, DeviceReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
