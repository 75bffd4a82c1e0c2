mod commands;
mod terminal;

use std::time::Duration;

use commands::{CommandLine, Commands, check, devices, import, probe, watch};
use netcheck_common::config::Config;
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse_args();
    let _log_guard = logging::init_logging(cli.log_file().as_deref(), cli.quiet)?;

    let quiet: u8 = cli.quiet;
    let base = Config {
        quiet,
        ..Config::default()
    };

    match cli.command {
        Commands::Check { ip, probe: opts } => check::check(&ip, &opts.to_config(quiet)).await,
        Commands::Probe {
            probe: opts,
            source,
            json,
        } => probe::probe(&opts.to_config(quiet), &source, json).await,
        Commands::Watch {
            probe: opts,
            source,
            interval,
        } => {
            let cfg = Config {
                interval: Duration::from_secs(interval.max(1)),
                ..opts.to_config(quiet)
            };
            watch::watch(&cfg, &source).await
        }
        Commands::Import { file, source } => import::import(&file, &source, &base),
        Commands::Devices { source } => devices::devices(&source, &base),
    }
}
