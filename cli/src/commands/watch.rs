use std::sync::Arc;
use std::time::Duration;

use netcheck_common::config::Config;
use netcheck_common::success;
use netcheck_core::Monitor;
use netcheck_core::registry::RegistryStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::ConfigSource;
use super::probe::print_report;
use crate::terminal::print;

const RELOAD_POLL: Duration = Duration::from_secs(1);

pub async fn watch(cfg: &Config, source: &ConfigSource) -> anyhow::Result<()> {
    let store: Arc<RegistryStore> = Arc::new(source.open_store()?);

    let monitor: Monitor = Monitor::from_config(cfg);
    let shutdown: CancellationToken = CancellationToken::new();

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        }
    });

    let poller = tokio::spawn(poll_config_file(Arc::clone(&store), shutdown.clone()));

    info!(
        "Watching {} (every {}s, Ctrl-C to stop)",
        store.path().display(),
        cfg.interval.as_secs()
    );

    let mut cycle: usize = 0;
    monitor
        .watch(&store, cfg.interval, &shutdown, |report| {
            cycle += 1;
            print::header(&format!("cycle {cycle}"), cfg.quiet);
            if report.is_empty() {
                print::no_devices(&store.path().display().to_string());
            }
            print_report(report, cfg);
        })
        .await;

    shutdown.cancel();
    let _ = poller.await;
    success!("Stopped after {cycle} cycle(s)");
    Ok(())
}

/// Reloads the store whenever the device file changes on disk.
///
/// The file checks run on the blocking pool.
async fn poll_config_file(store: Arc<RegistryStore>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(RELOAD_POLL) => {
                let store = Arc::clone(&store);
                match tokio::task::spawn_blocking(move || store.reload_if_changed()).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => warn!("Keeping previous devices: {e}"),
                    Err(e) => warn!("Device file check failed: {e}"),
                }
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
