use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use netcheck_common::error::ProbeErrorKind;
use netcheck_common::network::probe::ProbeOutcome;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use super::ProbeStrategy;

/// Liveness through a TCP handshake.
///
/// Needs no privileges. A completed handshake counts as alive; the stream is
/// closed straight away without sending anything.
#[derive(Debug, Clone, Copy)]
pub struct TcpConnect {
    port: u16,
}

impl TcpConnect {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[async_trait]
impl ProbeStrategy for TcpConnect {
    async fn probe(&self, target: IpAddr, probe_timeout: Duration) -> ProbeOutcome {
        let socket_addr: SocketAddr = SocketAddr::new(target, self.port);
        let started: Instant = Instant::now();

        match timeout(probe_timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(stream)) => {
                let latency: Duration = started.elapsed();
                drop(stream);
                debug!(%socket_addr, ?latency, "handshake completed");
                ProbeOutcome::up(target, Some(latency))
            }
            Ok(Err(err)) => {
                debug!(%socket_addr, "handshake failed: {err}");
                ProbeOutcome::down(target, ProbeErrorKind::from(&err))
            }
            Err(_elapsed) => {
                debug!(%socket_addr, "handshake timed out");
                ProbeOutcome::down(target, ProbeErrorKind::Timeout)
            }
        }
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
