pub mod check;
pub mod devices;
pub mod import;
pub mod probe;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use netcheck_common::config::{
    Config, DEFAULT_MAX_CONCURRENCY, DEFAULT_TCP_PORT,
};
use netcheck_common::network::probe::ProbeKind;
use netcheck_core::registry::RegistryStore;
use netcheck_core::registry::paths;

#[derive(Parser)]
#[command(name = "netcheck")]
#[command(about = "Checks whether configured network devices are reachable.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less; repeat to only show errors
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not append to app.log next to the device file
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a single host answers
    #[command(alias = "c")]
    Check {
        ip: String,
        #[command(flatten)]
        probe: ProbeOptions,
    },
    /// Probe every configured device once
    #[command(alias = "p")]
    Probe {
        #[command(flatten)]
        probe: ProbeOptions,
        #[command(flatten)]
        source: ConfigSource,
        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Probe the configured devices repeatedly until interrupted
    #[command(alias = "w")]
    Watch {
        #[command(flatten)]
        probe: ProbeOptions,
        #[command(flatten)]
        source: ConfigSource,
        /// Seconds between two cycles
        #[arg(short, long, default_value_t = 5)]
        interval: u64,
    },
    /// Validate a device file and make it the active configuration
    #[command(alias = "i")]
    Import {
        file: PathBuf,
        #[command(flatten)]
        source: ConfigSource,
    },
    /// List the configured devices
    #[command(alias = "d")]
    Devices {
        #[command(flatten)]
        source: ConfigSource,
    },
}

#[derive(Args, Clone, Debug)]
pub struct ProbeOptions {
    /// Probe strategy: tcp or icmp
    #[arg(short, long, default_value = "tcp")]
    pub strategy: ProbeKind,
    /// Per-host timeout in milliseconds
    #[arg(short, long, default_value_t = 2_000)]
    pub timeout: u64,
    /// Maximum number of probes in flight
    #[arg(short = 'j', long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub concurrency: usize,
    /// Port used by the tcp strategy
    #[arg(short, long, default_value_t = DEFAULT_TCP_PORT)]
    pub port: u16,
}

#[derive(Args, Clone, Debug)]
pub struct ConfigSource {
    /// Device file to use instead of Documents/network-checker/config.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Where the log file goes, unless disabled or unresolvable.
    pub fn log_file(&self) -> Option<PathBuf> {
        if self.no_log_file {
            return None;
        }
        paths::default_log_path().ok()
    }
}

impl ProbeOptions {
    pub fn to_config(&self, quiet: u8) -> Config {
        Config {
            strategy: self.strategy,
            timeout: Duration::from_millis(self.timeout),
            max_concurrency: self.concurrency,
            tcp_port: self.port,
            quiet,
            ..Config::default()
        }
    }
}

impl ConfigSource {
    pub fn open_store(&self) -> anyhow::Result<RegistryStore> {
        let store = match &self.config {
            Some(path) => RegistryStore::open(path.clone()),
            None => RegistryStore::open_default(),
        };
        store.context("failed to load the device configuration")
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
