use std::net::IpAddr;

use serde::Serialize;

use crate::network::probe::ProbeKind;

/// One addressable interface of a [`Device`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInterface {
    pub name: String,
    #[serde(rename = "ip")]
    pub address: IpAddr,
    /// Strategy override for this interface only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeKind>,
}

impl NetworkInterface {
    pub fn new(name: impl Into<String>, address: IpAddr) -> Self {
        Self {
            name: name.into(),
            address,
            probe: None,
        }
    }

    pub fn with_probe(mut self, kind: ProbeKind) -> Self {
        self.probe = Some(kind);
        self
    }

    /// Strategy to use for this interface, given the session default.
    pub fn strategy_or(&self, default: ProbeKind) -> ProbeKind {
        self.probe.unwrap_or(default)
    }
}

/// A logical machine exposing one or more interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub name: String,
    #[serde(rename = "nics")]
    pub interfaces: Vec<NetworkInterface>,
}

impl Device {
    pub fn new(name: impl Into<String>, interfaces: Vec<NetworkInterface>) -> Self {
        Self {
            name: name.into(),
            interfaces,
        }
    }

    /// Devices without interfaces are reported but never probed.
    pub fn is_probeable(&self) -> bool {
        !self.interfaces.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.interfaces.iter().map(|nic| nic.address)
    }
}
