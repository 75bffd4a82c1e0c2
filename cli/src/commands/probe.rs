use std::time::{Duration, Instant};

use colored::*;
use netcheck_common::config::Config;
use netcheck_common::network::report::ProbeReport;
use netcheck_common::success;
use netcheck_core::Monitor;
use netcheck_core::registry::DeviceRegistry;
use tracing::Instrument;

use super::ConfigSource;
use crate::nprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn probe(cfg: &Config, source: &ConfigSource, json: bool) -> anyhow::Result<()> {
    let store = source.open_store()?;
    let registry = store.snapshot();

    if registry.is_empty() && !json {
        print::no_devices(&store.path().display().to_string());
        return Ok(());
    }

    let interfaces: usize = registry.devices().iter().map(|d| d.interfaces.len()).sum();
    let monitor: Monitor = Monitor::from_config(cfg);

    let started: Instant = Instant::now();
    let report: ProbeReport = monitor
        .run_cycle(registry)
        .instrument(spinner::cycle_span(interfaces))
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print::header("probe report", cfg.quiet);
    print_report(&report, cfg);
    print_summary(&report, started.elapsed(), cfg);
    Ok(())
}

/// Lists the interfaces the loader had to leave out.
pub fn print_issues(registry: &DeviceRegistry) {
    if registry.issues().is_empty() {
        return;
    }
    print::print_status(format!("{} interface(s) skipped:", registry.issues().len()));
    let rows: Vec<(String, ColoredString)> = registry
        .issues()
        .iter()
        .map(|issue| {
            (
                format!("{}/{}", issue.device, issue.interface),
                issue.reason.color(colors::OFFLINE),
            )
        })
        .collect();
    print::tree_rows(&rows);
}

pub fn print_report(report: &ProbeReport, cfg: &Config) {
    for (idx, entry) in report.iter().enumerate() {
        if cfg.quiet > 1 {
            continue;
        }

        let state: ColoredString = if entry.any_reachable {
            "online".color(colors::ONLINE).bold()
        } else {
            "offline".color(colors::OFFLINE).bold()
        };
        print::tree_head(idx, &format!("{} {}", entry.device.name, state));

        if entry.device.interfaces.is_empty() {
            print::print_status("no interfaces configured");
        } else {
            let details: Vec<(String, ColoredString)> = entry
                .device
                .interfaces
                .iter()
                .zip(&entry.outcomes)
                .map(|(nic, outcome)| format::interface_to_detail(nic, outcome))
                .collect();
            print::tree_rows(&details);
        }

        if idx + 1 != report.len() {
            nprint!();
        }
    }
}

fn print_summary(report: &ProbeReport, total_time: Duration, cfg: &Config) {
    let online: ColoredString = format!("{}/{} devices online", report.reachable_devices(), report.len())
        .bold()
        .green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Probe Complete: {online} in {total_time}");

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => success!("{}", output),
    }
}
