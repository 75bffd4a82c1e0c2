//! Concurrent fan-out of probes over a set of targets.
//!
//! Every distinct target gets its own task. A semaphore caps how many of them
//! hold a socket at the same time, every probe is bounded by its own timeout,
//! and a [`CancellationToken`] lets the caller abandon the whole run. Whatever
//! happens, the returned map has exactly one outcome per distinct target.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use netcheck_common::config::Config;
use netcheck_common::error::ProbeErrorKind;
use netcheck_common::network::probe::{ProbeKey, ProbeKind, ProbeOutcome, ProbeRequest};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::strategy::{ProbeStrategy, Strategies};

pub struct Prober {
    strategies: Strategies,
    max_concurrency: usize,
}

impl Prober {
    /// `max_concurrency` is clamped to at least one probe in flight.
    pub fn new(strategies: Strategies, max_concurrency: usize) -> Self {
        Self {
            strategies,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Strategies::from_config(cfg), cfg.max_concurrency)
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Probes every distinct target of `requests` and waits for all of them.
    ///
    /// When a target appears more than once, the first request wins. Once
    /// `cancel` fires, probes still waiting or running resolve to
    /// [`ProbeErrorKind::Cancelled`] and outcomes that already finished are kept.
    pub async fn run(
        &self,
        requests: Vec<ProbeRequest>,
        cancel: &CancellationToken,
    ) -> HashMap<IpAddr, ProbeOutcome> {
        let mut seen: HashSet<IpAddr> = HashSet::with_capacity(requests.len());
        let requests: Vec<ProbeRequest> = requests
            .into_iter()
            .filter(|request| seen.insert(request.target))
            .collect();

        self.run_keyed(requests, cancel)
            .await
            .into_iter()
            .map(|((target, _), outcome)| (target, outcome))
            .collect()
    }

    /// Like [`Prober::run`], but an address probed with two strategies is
    /// probed twice and answered once per `(target, strategy)` pair.
    pub async fn run_keyed(
        &self,
        requests: Vec<ProbeRequest>,
        cancel: &CancellationToken,
    ) -> HashMap<ProbeKey, ProbeOutcome> {
        let requests: Vec<ProbeRequest> = distinct_keys(requests);
        let semaphore: Arc<Semaphore> = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks: JoinSet<(ProbeKind, ProbeOutcome)> = JoinSet::new();

        debug!(
            probes = requests.len(),
            max_concurrency = self.max_concurrency,
            "dispatching probes"
        );

        for request in &requests {
            let strategy: Arc<dyn ProbeStrategy> = self.strategies.get(request.strategy);
            let semaphore: Arc<Semaphore> = Arc::clone(&semaphore);
            let cancel: CancellationToken = cancel.clone();
            let request: ProbeRequest = *request;
            tasks.spawn(async move {
                (request.strategy, probe_task(request, strategy, semaphore, cancel).await)
            });
        }

        let mut outcomes: HashMap<ProbeKey, ProbeOutcome> = HashMap::with_capacity(requests.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((kind, outcome)) => {
                    outcomes.insert((outcome.target, kind), outcome);
                }
                Err(err) => error!("probe task failed: {err}"),
            }
        }

        // A panicked task leaves no outcome behind; its target is still reported.
        for request in &requests {
            outcomes
                .entry(request.key())
                .or_insert_with(|| ProbeOutcome::down(request.target, ProbeErrorKind::TaskFailed));
        }

        outcomes
    }
}

/// Probes `targets` with a single strategy using the default strategy set.
pub async fn probe_run(
    targets: &[IpAddr],
    strategy: ProbeKind,
    probe_timeout: Duration,
    max_concurrency: usize,
) -> HashMap<IpAddr, ProbeOutcome> {
    let prober: Prober = Prober::new(Strategies::default(), max_concurrency);
    let requests: Vec<ProbeRequest> = targets
        .iter()
        .map(|&target| ProbeRequest::new(target, probe_timeout, strategy))
        .collect();
    prober.run(requests, &CancellationToken::new()).await
}

fn distinct_keys(requests: Vec<ProbeRequest>) -> Vec<ProbeRequest> {
    let mut seen: HashSet<ProbeKey> = HashSet::with_capacity(requests.len());
    requests
        .into_iter()
        .filter(|request| seen.insert(request.key()))
        .collect()
}

async fn probe_task(
    request: ProbeRequest,
    strategy: Arc<dyn ProbeStrategy>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
) -> ProbeOutcome {
    let target: IpAddr = request.target;

    let _permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => return ProbeOutcome::down(target, ProbeErrorKind::Cancelled),
        permit = semaphore.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_closed) => return ProbeOutcome::down(target, ProbeErrorKind::Cancelled),
        },
    };

    let outcome: ProbeOutcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(%target, "probe abandoned");
            ProbeOutcome::down(target, ProbeErrorKind::Cancelled)
        }
        verdict = timeout(request.timeout, strategy.probe(target, request.timeout)) => {
            verdict.unwrap_or_else(|_elapsed| ProbeOutcome::down(target, ProbeErrorKind::Timeout))
        }
    };

    debug!(%target, reachable = outcome.reachable, error = ?outcome.error, "probe finished");
    outcome
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
