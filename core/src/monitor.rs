//! # Probe Cycles
//!
//! A cycle takes a device snapshot, probes every interface and folds the
//! outcomes into a [`ProbeReport`]. [`Monitor`] runs cycles one after another
//! and makes sure a new cycle always supersedes the previous one.

use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use netcheck_common::config::{Config, DEFAULT_TCP_PORT, DEFAULT_TIMEOUT};
use netcheck_common::network::device::Device;
use netcheck_common::network::probe::{ProbeKind, ProbeRequest};
use netcheck_common::network::report::ProbeReport;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregator;
use crate::prober::Prober;
use crate::registry::{DeviceRegistry, RegistryStore};
use crate::strategy::{ProbeStrategy, Strategies, TcpConnect};

/// Single-host check kept for callers that only want a yes or no.
///
/// TCP handshake on port 80 with a two second timeout. An address that does
/// not parse is simply not reachable.
pub async fn check_device(ip: &str) -> bool {
    let target: IpAddr = match ip.trim().parse() {
        Ok(target) => target,
        Err(e) => {
            warn!("Cannot check '{ip}': {e}");
            return false;
        }
    };

    info!("Checking device: {target}");
    let outcome = TcpConnect::new(DEFAULT_TCP_PORT)
        .probe(target, DEFAULT_TIMEOUT)
        .await;

    match outcome.error {
        None => info!("SUCCESS {target}: connected"),
        Some(kind) => info!("FAILED {target}: {kind}"),
    }
    outcome.reachable
}

/// Probes every interface of `devices` once and builds the report.
pub async fn run_probe_cycle(
    devices: &[Device],
    strategy: ProbeKind,
    probe_timeout: Duration,
    max_concurrency: usize,
) -> ProbeReport {
    let prober: Prober = Prober::new(Strategies::default(), max_concurrency);
    cycle(&prober, devices, strategy, probe_timeout, &CancellationToken::new()).await
}

/// One request per interface; devices without interfaces yield none.
pub fn build_requests(devices: &[Device], default: ProbeKind, probe_timeout: Duration) -> Vec<ProbeRequest> {
    devices
        .iter()
        .flat_map(|device| device.interfaces.iter())
        .map(|nic| ProbeRequest::new(nic.address, probe_timeout, nic.strategy_or(default)))
        .collect()
}

async fn cycle(
    prober: &Prober,
    devices: &[Device],
    strategy: ProbeKind,
    probe_timeout: Duration,
    cancel: &CancellationToken,
) -> ProbeReport {
    let started: Instant = Instant::now();
    let requests: Vec<ProbeRequest> = build_requests(devices, strategy, probe_timeout);
    let outcomes = prober.run_keyed(requests, cancel).await;
    let report: ProbeReport = aggregator::aggregate_keyed(devices, strategy, &outcomes);

    debug!(
        devices = report.len(),
        reachable = report.reachable_devices(),
        elapsed = ?started.elapsed(),
        "probe cycle finished"
    );
    report
}

/// Runs probe cycles against registry snapshots.
pub struct Monitor {
    prober: Prober,
    strategy: ProbeKind,
    timeout: Duration,
    current: Mutex<CancellationToken>,
}

impl Monitor {
    pub fn new(prober: Prober, strategy: ProbeKind, probe_timeout: Duration) -> Self {
        Self {
            prober,
            strategy,
            timeout: probe_timeout,
            current: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Prober::from_config(cfg), cfg.strategy, cfg.timeout)
    }

    /// Runs one cycle over `registry`, cancelling any cycle still in flight.
    ///
    /// The stale cycle's probes let go of their sockets on their own; this
    /// call never waits for them.
    pub async fn run_cycle(&self, registry: Arc<DeviceRegistry>) -> ProbeReport {
        let token: CancellationToken = self.begin_cycle();
        cycle(&self.prober, registry.devices(), self.strategy, self.timeout, &token).await
    }

    /// Cancels the cycle in flight, if any.
    pub fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    fn begin_cycle(&self) -> CancellationToken {
        let fresh: CancellationToken = CancellationToken::new();
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let stale: CancellationToken = std::mem::replace(&mut *current, fresh.clone());
        stale.cancel();
        fresh
    }

    /// Probes the store's devices every `interval` until `shutdown` fires.
    ///
    /// A reload of the store restarts the cycle at once, dropping the one in
    /// flight, so reports always describe the latest snapshot.
    pub async fn watch<F>(
        &self,
        store: &RegistryStore,
        interval: Duration,
        shutdown: &CancellationToken,
        mut on_report: F,
    ) where
        F: FnMut(&ProbeReport),
    {
        let mut reloads = store.subscribe();

        loop {
            let snapshot: Arc<DeviceRegistry> = store.snapshot();

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                changed = reloads.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    info!("Configuration reloaded, restarting probe cycle");
                    continue;
                }
                report = self.run_cycle(snapshot) => on_report(&report),
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                changed = reloads.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    info!("Configuration reloaded");
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        self.cancel();
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

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use netcheck_common::error::ProbeErrorKind;
    use netcheck_common::network::device::NetworkInterface;
    use netcheck_common::network::probe::ProbeOutcome;
    use std::net::Ipv4Addr;

    struct AlwaysUp;

    #[async_trait]
    impl ProbeStrategy for AlwaysUp {
        async fn probe(&self, target: IpAddr, _timeout: Duration) -> ProbeOutcome {
            ProbeOutcome::up(target, Some(Duration::from_millis(1)))
        }
    }

    struct Stalled;

    #[async_trait]
    impl ProbeStrategy for Stalled {
        async fn probe(&self, _target: IpAddr, _timeout: Duration) -> ProbeOutcome {
            std::future::pending().await
        }
    }

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(192, 0, 2, last))
    }

    #[test]
    fn requests_honour_interface_override() {
        let devices = vec![
            Device::new(
                "Cam",
                vec![
                    NetworkInterface::new("eth0", ip(1)),
                    NetworkInterface::new("wifi", ip(2)).with_probe(ProbeKind::IcmpEcho),
                ],
            ),
            Device::new("Spare", vec![]),
        ];

        let requests = build_requests(&devices, ProbeKind::TcpConnect, Duration::from_secs(1));
        let kinds: Vec<ProbeKind> = requests.iter().map(|r| r.strategy).collect();
        assert_eq!(kinds, [ProbeKind::TcpConnect, ProbeKind::IcmpEcho]);
    }

    #[tokio::test]
    async fn check_device_rejects_garbage() {
        assert!(!check_device("not an ip").await);
    }

    #[tokio::test]
    async fn empty_device_list_gives_empty_report() {
        let report = run_probe_cycle(&[], ProbeKind::TcpConnect, Duration::from_millis(100), 4).await;
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn new_cycle_cancels_previous_one() {
        let strategies = Strategies::default().with(ProbeKind::IcmpEcho, Arc::new(Stalled));
        let monitor = Arc::new(Monitor::new(
            Prober::new(strategies, 4),
            ProbeKind::IcmpEcho,
            Duration::from_secs(60),
        ));
        let registry = Arc::new(DeviceRegistry::from_devices(vec![Device::new(
            "Slow",
            vec![NetworkInterface::new("eth0", ip(5))],
        )]));

        let first = tokio::spawn({
            let monitor = Arc::clone(&monitor);
            let registry = Arc::clone(&registry);
            async move { monitor.run_cycle(registry).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = tokio::spawn({
            let monitor = Arc::clone(&monitor);
            async move { monitor.run_cycle(registry).await }
        });

        let stale = tokio::time::timeout(Duration::from_secs(5), first)
            .await
            .expect("stale cycle did not stop")
            .unwrap();
        let slow = stale.device("Slow").unwrap();
        assert_eq!(slow.outcomes[0].error, Some(ProbeErrorKind::Cancelled));

        monitor.cancel();
        let fresh = tokio::time::timeout(Duration::from_secs(5), second)
            .await
            .expect("fresh cycle did not stop")
            .unwrap();
        assert_eq!(fresh.device("Slow").unwrap().outcomes.len(), 1);
    }

    #[tokio::test]
    async fn watch_reports_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"devices":[{"name":"Router","nics":[{"name":"eth0","ip":"192.0.2.1"}]}]}"#,
        )
        .unwrap();
        let store = RegistryStore::open(&path).unwrap();

        let strategies = Strategies::default().with(ProbeKind::TcpConnect, Arc::new(AlwaysUp));
        let monitor = Monitor::new(Prober::new(strategies, 4), ProbeKind::TcpConnect, Duration::from_secs(1));
        let shutdown = CancellationToken::new();

        let mut reports: Vec<ProbeReport> = Vec::new();
        let stop = shutdown.clone();
        monitor
            .watch(&store, Duration::from_millis(10), &shutdown, |report| {
                reports.push(report.clone());
                if reports.len() == 3 {
                    stop.cancel();
                }
            })
            .await;

        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|report| report.reachable_devices() == 1));
    }

    /// Never answers for `slow`, answers at once for anything else.
    struct StallsOn(IpAddr);

    #[async_trait]
    impl ProbeStrategy for StallsOn {
        async fn probe(&self, target: IpAddr, _timeout: Duration) -> ProbeOutcome {
            if target == self.0 {
                std::future::pending::<()>().await;
            }
            ProbeOutcome::up(target, Some(Duration::from_millis(1)))
        }
    }

    #[tokio::test]
    async fn reload_supersedes_running_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let active = dir.path().join("config.json");
        std::fs::write(
            &active,
            r#"{"devices":[{"name":"Stuck","nics":[{"name":"eth0","ip":"192.0.2.7"}]}]}"#,
        )
        .unwrap();
        let replacement = dir.path().join("replacement.json");
        std::fs::write(
            &replacement,
            r#"{"devices":[{"name":"Fresh","nics":[{"name":"eth0","ip":"192.0.2.8"}]}]}"#,
        )
        .unwrap();

        let store = Arc::new(RegistryStore::open(&active).unwrap());
        let strategies = Strategies::default().with(ProbeKind::TcpConnect, Arc::new(StallsOn(ip(7))));
        let monitor = Monitor::new(Prober::new(strategies, 4), ProbeKind::TcpConnect, Duration::from_secs(60));
        let shutdown = CancellationToken::new();

        let importer = tokio::spawn({
            let store = Arc::clone(&store);
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                store.import(&replacement).map(|_| ())
            }
        });

        let mut reports: Vec<ProbeReport> = Vec::new();
        let stop = shutdown.clone();
        let watched = tokio::time::timeout(
            Duration::from_secs(5),
            monitor.watch(&store, Duration::from_secs(60), &shutdown, |report| {
                reports.push(report.clone());
                stop.cancel();
            }),
        )
        .await;

        assert!(watched.is_ok(), "stalled cycle was not superseded");
        importer.await.unwrap().unwrap();
        assert_eq!(reports.len(), 1);
        let names: Vec<&str> = reports[0].iter().map(|entry| entry.device.name.as_str()).collect();
        assert_eq!(names, ["Fresh"]);
        assert!(reports[0].device("Fresh").unwrap().any_reachable);
    }
}
