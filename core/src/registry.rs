//! # Device Registry
//!
//! In-memory model of the configured devices, decoded from the JSON file
//! the user picked:
//!
//! ```json
//! { "devices": [ { "name": "Router", "nics": [ { "name": "eth0", "ip": "192.168.1.1" } ] } ] }
//! ```
//!
//! * Unknown fields are ignored; a missing or `null` `devices`/`nics` is empty.
//! * A document that is not valid JSON fails as a whole.
//! * An interface with a missing or unparsable `ip` (or an unknown `probe`)
//!   is skipped and recorded as a [`LoadIssue`]; the rest still loads.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::net::IpAddr;
use std::path::Path;

use netcheck_common::error::RegistryError;
use netcheck_common::network::device::{Device, NetworkInterface};
use netcheck_common::network::probe::ProbeKind;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

pub mod paths;
pub mod store;

pub use store::RegistryStore;

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    devices: Option<Vec<RawDevice>>,
}

#[derive(Debug, Deserialize)]
struct RawDevice {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nics: Option<Vec<RawNic>>,
}

#[derive(Debug, Deserialize)]
struct RawNic {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    ip: Option<Value>,
    #[serde(default)]
    probe: Option<Value>,
}

/// An interface that was left out while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    pub device: String,
    pub interface: String,
    pub reason: String,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.device, self.interface, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    issues: Vec<LoadIssue>,
}

impl DeviceRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_devices(devices: Vec<Device>) -> Self {
        Self {
            devices,
            issues: Vec::new(),
        }
    }

    /// Decodes a device document.
    pub fn load(raw: &[u8]) -> Result<Self, RegistryError> {
        let config: RawConfig = serde_json::from_slice(raw)?;
        let mut issues: Vec<LoadIssue> = Vec::new();

        let devices: Vec<Device> = config
            .devices
            .unwrap_or_default()
            .into_iter()
            .map(|raw_device| decode_device(raw_device, &mut issues))
            .collect();

        for issue in &issues {
            warn!("Skipping interface {issue}");
        }
        debug!(devices = devices.len(), skipped = issues.len(), "device document decoded");

        Ok(Self { devices, issues })
    }

    /// Loads the document at `path`. A missing file is an empty registry.
    pub fn load_from_path(path: &Path) -> Result<Self, RegistryError> {
        match fs::read(path) {
            Ok(bytes) => Self::load(&bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no device file at {}, starting empty", path.display());
                Ok(Self::empty())
            }
            Err(err) => Err(RegistryError::io(path, err)),
        }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn issues(&self) -> &[LoadIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Distinct interface addresses in file order.
    pub fn targets(&self) -> Vec<IpAddr> {
        let mut seen: HashSet<IpAddr> = HashSet::new();
        self.devices
            .iter()
            .flat_map(Device::addresses)
            .filter(|addr| seen.insert(*addr))
            .collect()
    }
}

fn decode_device(raw: RawDevice, issues: &mut Vec<LoadIssue>) -> Device {
    let name: String = raw.name.unwrap_or_default();
    let interfaces: Vec<NetworkInterface> = raw
        .nics
        .unwrap_or_default()
        .into_iter()
        .filter_map(|nic| {
            let nic_name: String = nic.name.unwrap_or_default();
            match decode_interface(&nic_name, nic.ip, nic.probe) {
                Ok(interface) => Some(interface),
                Err(reason) => {
                    issues.push(LoadIssue {
                        device: name.clone(),
                        interface: nic_name,
                        reason,
                    });
                    None
                }
            }
        })
        .collect();

    Device::new(name, interfaces)
}

fn decode_interface(
    name: &str,
    ip: Option<Value>,
    probe: Option<Value>,
) -> Result<NetworkInterface, String> {
    let address: IpAddr = match ip {
        Some(Value::String(text)) => text
            .trim()
            .parse::<IpAddr>()
            .map_err(|e| format!("invalid ip '{text}': {e}"))?,
        Some(Value::Null) | None => return Err("missing ip".to_string()),
        Some(other) => return Err(format!("ip must be a string, found {other}")),
    };

    let interface: NetworkInterface = NetworkInterface::new(name, address);
    match probe {
        Some(Value::String(text)) => Ok(interface.with_probe(text.parse::<ProbeKind>()?)),
        Some(Value::Null) | None => Ok(interface),
        Some(other) => Err(format!("probe must be a string, found {other}")),
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
