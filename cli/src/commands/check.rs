use std::net::IpAddr;

use anyhow::Context;
use colored::Colorize;
use netcheck_common::config::Config;
use netcheck_common::network::probe::ProbeOutcome;
use netcheck_core::strategy::Strategies;

use crate::terminal::{format, print};

pub async fn check(ip: &str, cfg: &Config) -> anyhow::Result<()> {
    let target: IpAddr = ip
        .trim()
        .parse()
        .with_context(|| format!("'{ip}' is not an IP address"))?;

    print::header("host check", cfg.quiet);
    let strategy = Strategies::from_config(cfg).get(cfg.strategy);
    let outcome: ProbeOutcome = strategy.probe(target, cfg.timeout).await;

    print::tree_head(0, &target.to_string());
    print::tree_rows(&[
        ("Probe".to_string(), cfg.strategy.to_string().normal()),
        ("Status".to_string(), format::status(&outcome)),
    ]);
    Ok(())
}

