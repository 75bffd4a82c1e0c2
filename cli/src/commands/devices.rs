use colored::*;
use netcheck_common::config::Config;

use super::ConfigSource;
use super::probe::print_issues;
use crate::nprint;
use crate::terminal::{format, print};

pub fn devices(source: &ConfigSource, cfg: &Config) -> anyhow::Result<()> {
    let store = source.open_store()?;
    let registry = store.snapshot();

    print::header("configured devices", cfg.quiet);
    if registry.is_empty() {
        print::no_devices(&store.path().display().to_string());
        return Ok(());
    }

    for (idx, device) in registry.devices().iter().enumerate() {
        print::tree_head(idx, &device.name);
        let details: Vec<(String, ColoredString)> = device
            .interfaces
            .iter()
            .map(|nic| {
                let probe: String = nic
                    .probe
                    .map(|kind| format!(" via {kind}"))
                    .unwrap_or_default();
                (nic.name.clone(), format!("{}{}", format::address(&nic.address), probe).normal())
            })
            .collect();

        if details.is_empty() {
            print::print_status("no interfaces configured");
        } else {
            print::tree_rows(&details);
        }

        if idx + 1 != registry.devices().len() {
            nprint!();
        }
    }

    if !registry.issues().is_empty() {
        nprint!();
        print_issues(&registry);
    }
    Ok(())
}
