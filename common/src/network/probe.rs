//! # Probe Model
//!
//! A probe asks one question about one address: does it answer within the
//! timeout? [`ProbeRequest`] carries the question, [`ProbeOutcome`] the answer.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ProbeErrorKind;

/// The liveness check used for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProbeKind {
    /// TCP handshake against a fixed port, closed right after it succeeds.
    #[default]
    #[serde(rename = "tcp")]
    TcpConnect,
    /// A single unprivileged ICMP echo request.
    #[serde(rename = "icmp", alias = "ping")]
    IcmpEcho,
}

impl FromStr for ProbeKind {
    type Err = String;

    /// Accepts "tcp", "icmp" and "ping" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tcp" => Ok(Self::TcpConnect),
            "icmp" | "ping" => Ok(Self::IcmpEcho),
            other => Err(format!("unknown probe strategy: {other}")),
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TcpConnect => f.write_str("tcp"),
            Self::IcmpEcho => f.write_str("icmp"),
        }
    }
}

/// An address together with the strategy used on it.
pub type ProbeKey = (IpAddr, ProbeKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRequest {
    pub target: IpAddr,
    pub timeout: Duration,
    pub strategy: ProbeKind,
}

impl ProbeRequest {
    pub fn new(target: IpAddr, timeout: Duration, strategy: ProbeKind) -> Self {
        Self {
            target,
            timeout,
            strategy,
        }
    }

    pub fn key(&self) -> ProbeKey {
        (self.target, self.strategy)
    }
}

/// Verdict of a single probe.
///
/// A reachable outcome never carries an error and an unreachable one always
/// does. Use [`ProbeOutcome::up`] and [`ProbeOutcome::down`] to build them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub target: IpAddr,
    pub reachable: bool,
    #[serde(rename = "latency_ms", serialize_with = "latency_as_millis")]
    pub latency: Option<Duration>,
    pub error: Option<ProbeErrorKind>,
}

impl ProbeOutcome {
    pub fn up(target: IpAddr, latency: Option<Duration>) -> Self {
        Self {
            target,
            reachable: true,
            latency,
            error: None,
        }
    }

    pub fn down(target: IpAddr, error: ProbeErrorKind) -> Self {
        Self {
            target,
            reachable: false,
            latency: None,
            error: Some(error),
        }
    }
}

fn latency_as_millis<S: Serializer>(latency: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match latency {
        Some(rtt) => s.serialize_some(&(rtt.as_secs_f64() * 1_000.0)),
        None => s.serialize_none(),
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
