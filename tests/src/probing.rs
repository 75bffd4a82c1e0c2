#![cfg(test)]
use async_trait::async_trait;
use netcheck_common::error::ProbeErrorKind;
use netcheck_common::network::device::{Device, NetworkInterface};
use netcheck_common::network::probe::{ProbeKind, ProbeOutcome};
use netcheck_common::network::report::ProbeReport;
use netcheck_core::Monitor;
use netcheck_core::prober::Prober;
use netcheck_core::registry::DeviceRegistry;
use netcheck_core::strategy::{ProbeStrategy, Strategies};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_secs(2);
const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

fn router() -> Device {
    Device::new("Router", vec![NetworkInterface::new("eth0", LOCALHOST)])
}

fn monitor_on_port(port: u16, max_concurrency: usize) -> Monitor {
    let prober: Prober = Prober::new(Strategies::new(port), max_concurrency);
    Monitor::new(prober, ProbeKind::TcpConnect, TIMEOUT)
}

/// Reserves an ephemeral port and frees it again, leaving nothing listening.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// A device whose interface accepts connections shows up as reachable.
#[tokio::test]
async fn router_with_listener_is_reachable() {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });

    let registry = Arc::new(DeviceRegistry::from_devices(vec![router()]));
    let report: ProbeReport = monitor_on_port(port, 4).run_cycle(registry).await;

    assert_eq!(report.len(), 1);
    let entry = report.device("Router").expect("router missing from report");
    assert!(entry.any_reachable);
    assert_eq!(entry.outcomes.len(), 1);
    assert!(entry.outcomes[0].reachable);
    assert!(entry.outcomes[0].latency.is_some());
    assert!(entry.outcomes[0].error.is_none());
}

#[tokio::test]
async fn router_without_listener_is_refused() {
    let port = closed_port().await;
    let registry = Arc::new(DeviceRegistry::from_devices(vec![router()]));
    let report: ProbeReport = monitor_on_port(port, 4).run_cycle(registry).await;

    let entry = report.device("Router").unwrap();
    assert!(!entry.any_reachable);
    assert_eq!(entry.outcomes[0].error, Some(ProbeErrorKind::ConnectionRefused));
}

#[tokio::test]
async fn repeated_cycles_agree_across_concurrency_levels() {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });

    let devices: Vec<Device> = (1..=6u8)
        .map(|n| {
            Device::new(
                format!("host-{n}"),
                vec![NetworkInterface::new("lo", IpAddr::V4(Ipv4Addr::new(127, 0, 0, n)))],
            )
        })
        .collect();
    let registry = Arc::new(DeviceRegistry::from_devices(devices));

    let mut seen: Vec<Vec<(String, bool)>> = Vec::new();
    for max_concurrency in [1, 3, 64] {
        let report = monitor_on_port(port, max_concurrency)
            .run_cycle(Arc::clone(&registry))
            .await;
        seen.push(
            report
                .iter()
                .map(|entry| (entry.device.name.clone(), entry.any_reachable))
                .collect(),
        );
    }

    assert_eq!(seen[0].len(), 6);
    assert!(seen.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn unparsable_address_is_not_reachable() {
    assert!(!netcheck_core::check_device("not-an-ip").await);
    assert!(!netcheck_core::check_device("").await);
}

struct Fixed(bool);

#[async_trait]
impl ProbeStrategy for Fixed {
    async fn probe(&self, target: IpAddr, _timeout: Duration) -> ProbeOutcome {
        if self.0 {
            ProbeOutcome::up(target, Some(Duration::from_millis(1)))
        } else {
            ProbeOutcome::down(target, ProbeErrorKind::Timeout)
        }
    }
}

/// An interface that names its own probe is routed to that strategy.
#[tokio::test]
async fn interface_override_selects_strategy() {
    let strategies = Strategies::new(1)
        .with(ProbeKind::TcpConnect, Arc::new(Fixed(false)))
        .with(ProbeKind::IcmpEcho, Arc::new(Fixed(true)));
    let monitor = Monitor::new(Prober::new(strategies, 8), ProbeKind::TcpConnect, TIMEOUT);

    let pinged = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
    let dialed = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 2));
    let registry = Arc::new(DeviceRegistry::from_devices(vec![Device::new(
        "Switch",
        vec![
            NetworkInterface::new("mgmt", pinged).with_probe(ProbeKind::IcmpEcho),
            NetworkInterface::new("uplink", dialed),
        ],
    )]));

    let report = monitor.run_cycle(registry).await;

    assert!(report.outcome(pinged).unwrap().reachable);
    assert_eq!(report.outcome(dialed).unwrap().error, Some(ProbeErrorKind::Timeout));
    assert!(report.device("Switch").unwrap().any_reachable);
}

#[tokio::test]
async fn probe_run_answers_each_distinct_target_once() {
    let other = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2));
    let outcomes = netcheck_core::prober::probe_run(
        &[LOCALHOST, other, LOCALHOST],
        ProbeKind::TcpConnect,
        Duration::from_millis(500),
        2,
    )
    .await;

    assert_eq!(outcomes.len(), 2);
    for (target, outcome) in &outcomes {
        assert_eq!(outcome.target, *target);
        assert_eq!(outcome.reachable, outcome.error.is_none());
    }
}

#[tokio::test]
async fn device_without_interfaces_is_reported_offline() {
    let devices = vec![Device::new("Spare", vec![])];
    let report = netcheck_core::run_probe_cycle(&devices, ProbeKind::TcpConnect, TIMEOUT, 4).await;

    let entry = report.device("Spare").unwrap();
    assert!(entry.outcomes.is_empty());
    assert!(!entry.any_reachable);
    assert_eq!(report.reachable_devices(), 0);
}

/// Two devices share an address; only one of them asks for ICMP.
#[tokio::test]
async fn shared_address_keeps_each_interface_strategy() {
    let strategies = Strategies::new(1)
        .with(ProbeKind::TcpConnect, Arc::new(Fixed(false)))
        .with(ProbeKind::IcmpEcho, Arc::new(Fixed(true)));
    let monitor = Monitor::new(Prober::new(strategies, 8), ProbeKind::TcpConnect, TIMEOUT);

    let shared = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 9));
    let registry = Arc::new(DeviceRegistry::from_devices(vec![
        Device::new("Web", vec![NetworkInterface::new("eth0", shared)]),
        Device::new(
            "Pingable",
            vec![NetworkInterface::new("eth0", shared).with_probe(ProbeKind::IcmpEcho)],
        ),
    ]));

    let report = monitor.run_cycle(registry).await;

    let web = report.device("Web").unwrap();
    assert!(!web.any_reachable);
    assert_eq!(web.outcomes[0].error, Some(ProbeErrorKind::Timeout));
    assert!(report.device("Pingable").unwrap().any_reachable);
}
