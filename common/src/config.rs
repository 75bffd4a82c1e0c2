use std::time::Duration;

use crate::network::probe::ProbeKind;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_CONCURRENCY: usize = 64;
pub const DEFAULT_TCP_PORT: u16 = 80;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Runtime settings for a probing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Strategy used for every interface without its own override.
    pub strategy: ProbeKind,
    /// Upper bound for a single probe, from dispatch to verdict.
    pub timeout: Duration,
    /// Maximum number of probes in flight at once.
    pub max_concurrency: usize,
    /// Port dialled by the TCP-connect strategy.
    pub tcp_port: u16,
    /// Pause between two cycles in watch mode.
    pub interval: Duration,
    /// Verbosity reduction, 0 prints everything.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: ProbeKind::TcpConnect,
            timeout: DEFAULT_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            tcp_port: DEFAULT_TCP_PORT,
            interval: DEFAULT_INTERVAL,
            quiet: 0,
        }
    }
}
