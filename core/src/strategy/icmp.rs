//! ICMP echo through an **unprivileged** datagram socket.
//!
//! `surge-ping` asks the OS for a `SOCK_DGRAM` ICMP socket, which Linux grants
//! to users within `net.ipv4.ping_group_range` and macOS grants to everyone.
//! Each probe opens its own client so concurrent probes share nothing. Dropping
//! the client aborts its receive task and closes the socket.

use std::io;
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use netcheck_common::error::ProbeErrorKind;
use netcheck_common::network::probe::ProbeOutcome;
use surge_ping::{Client, Config as PingConfig, ICMP, PingIdentifier, PingSequence, SurgeError};
use tracing::{debug, warn};

use super::ProbeStrategy;

const PAYLOAD: [u8; 56] = [0; 56];

#[derive(Debug, Clone, Copy, Default)]
pub struct IcmpEcho;

impl IcmpEcho {
    fn client_for(target: IpAddr) -> io::Result<Client> {
        let config: PingConfig = match target {
            IpAddr::V4(_) => PingConfig::default(),
            IpAddr::V6(_) => PingConfig::builder().kind(ICMP::V6).build(),
        };
        Client::new(&config)
    }
}

#[async_trait]
impl ProbeStrategy for IcmpEcho {
    async fn probe(&self, target: IpAddr, probe_timeout: Duration) -> ProbeOutcome {
        let client: Client = match Self::client_for(target) {
            Ok(client) => client,
            Err(err) => {
                warn!(%target, "cannot open ICMP socket: {err}");
                return ProbeOutcome::down(target, ProbeErrorKind::from(&err));
            }
        };

        let mut pinger = client.pinger(target, PingIdentifier(rand::random())).await;
        pinger.timeout(probe_timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_reply, rtt)) => {
                debug!(%target, ?rtt, "echo reply received");
                ProbeOutcome::up(target, Some(rtt))
            }
            Err(err) => {
                debug!(%target, "echo failed: {err}");
                ProbeOutcome::down(target, classify(&err))
            }
        }
    }
}

fn classify(err: &SurgeError) -> ProbeErrorKind {
    match err {
        SurgeError::Timeout { .. } => ProbeErrorKind::Timeout,
        SurgeError::IOError(io_err) => ProbeErrorKind::from(io_err),
        _ => ProbeErrorKind::PacketLoss,
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
