//! The central **abstraction** for liveness checks.
//!
//! A [`ProbeStrategy`] answers one question for one address: is it alive within
//! the given timeout? Concrete techniques live in the submodules ([`tcp`] and
//! [`icmp`]). The [`Prober`](crate::prober::Prober) only ever talks to this
//! trait, so the technique is a runtime choice carried by
//! [`ProbeKind`] instead of a code edit.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use netcheck_common::config::{Config, DEFAULT_TCP_PORT};
use netcheck_common::network::probe::{ProbeKind, ProbeOutcome};

pub mod icmp;
pub mod tcp;

pub use icmp::IcmpEcho;
pub use tcp::TcpConnect;

/// A single liveness-check algorithm.
///
/// Implementations must be independent per invocation. The prober runs many of
/// them concurrently and drops the future when a run is cancelled, which has
/// to release whatever socket the probe holds.
#[async_trait]
pub trait ProbeStrategy: Send + Sync {
    /// Probes `target`, giving up after `timeout`.
    ///
    /// Failures are reported through the returned outcome, never as a panic
    /// or an error value.
    async fn probe(&self, target: IpAddr, timeout: Duration) -> ProbeOutcome;
}

/// One strategy per [`ProbeKind`].
#[derive(Clone)]
pub struct Strategies {
    tcp: Arc<dyn ProbeStrategy>,
    icmp: Arc<dyn ProbeStrategy>,
}

impl Strategies {
    pub fn new(tcp_port: u16) -> Self {
        Self {
            tcp: Arc::new(TcpConnect::new(tcp_port)),
            icmp: Arc::new(IcmpEcho),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.tcp_port)
    }

    /// Replaces the implementation used for `kind`.
    pub fn with(mut self, kind: ProbeKind, strategy: Arc<dyn ProbeStrategy>) -> Self {
        match kind {
            ProbeKind::TcpConnect => self.tcp = strategy,
            ProbeKind::IcmpEcho => self.icmp = strategy,
        }
        self
    }

    pub fn get(&self, kind: ProbeKind) -> Arc<dyn ProbeStrategy> {
        match kind {
            ProbeKind::TcpConnect => Arc::clone(&self.tcp),
            ProbeKind::IcmpEcho => Arc::clone(&self.icmp),
        }
    }
}

impl Default for Strategies {
    fn default() -> Self {
        Self::new(DEFAULT_TCP_PORT)
    }
}
