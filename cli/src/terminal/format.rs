use std::net::IpAddr;
use std::time::Duration;

use colored::*;
use netcheck_common::network::device::NetworkInterface;
use netcheck_common::network::probe::ProbeOutcome;

use crate::terminal::colors;

pub fn address(ip: &IpAddr) -> ColoredString {
    match ip {
        IpAddr::V4(ipv4_addr) => ipv4_addr.to_string().color(colors::IPV4_ADDR),
        IpAddr::V6(ipv6_addr) => ipv6_addr.to_string().color(colors::IPV6_ADDR),
    }
}

pub fn latency(rtt: Duration) -> String {
    format!("{:.1} ms", rtt.as_secs_f64() * 1_000.0)
}

/// `Online`/`Offline` badge with latency or failure reason.
pub fn status(outcome: &ProbeOutcome) -> ColoredString {
    match (outcome.reachable, outcome.latency, outcome.error) {
        (true, Some(rtt), _) => format!("Online ({})", latency(rtt)).color(colors::ONLINE).bold(),
        (true, None, _) => "Online".color(colors::ONLINE).bold(),
        (false, _, Some(kind)) => format!("Offline ({kind})").color(colors::OFFLINE),
        (false, _, None) => "Offline".color(colors::OFFLINE),
    }
}

/// One tree row per interface: `eth0 : 10.0.0.1 Online (1.2 ms)`.
pub fn interface_to_detail(nic: &NetworkInterface, outcome: &ProbeOutcome) -> (String, ColoredString) {
    let value: String = format!("{} {}", address(&nic.address), status(outcome));
    (nic.name.clone(), value.normal())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
