use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::*;
use netcheck_common::log::SUCCESS_TARGET;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::IndicatifFilter;
use tracing_subscriber::filter::{EnvFilter, filter_fn};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt as tracing_fmt};

use super::print::PRINT_TARGET;

const LOG_ENV: &str = "NETCHECK_LOG";

pub struct NetcheckFormatter;

impl<S, N> FormatEvent<S, N> for NetcheckFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if meta.target() == PRINT_TARGET {
            let mut raw = RawMessage::default();
            event.record(&mut raw);
            return writeln!(writer, "{}", raw.0.unwrap_or_default());
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
            if meta.target() == SUCCESS_TARGET {
                ("[✓]", |s| s.bright_green().bold())
            } else {
                match *meta.level() {
                    Level::TRACE => ("[ ]", |s| s.dimmed()),
                    Level::DEBUG => ("[?]", |s| s.blue()),
                    Level::INFO => ("[+]", |s| s.green().bold()),
                    Level::WARN => ("[*]", |s| s.yellow().bold()),
                    Level::ERROR => ("[-]", |s| s.red().bold()),
                }
            };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Pulls the `raw_msg` field out of a print event.
#[derive(Default)]
struct RawMessage(Option<String>);

impl Visit for RawMessage {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "raw_msg" {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "raw_msg" && self.0.is_none() {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

/// Keeps the log file open for the lifetime of the program.
///
/// Dropping it writes the shutdown marker and syncs the file.
pub struct LogGuard {
    file: Option<Arc<File>>,
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let mut handle: &File = &file;
            let _ = writeln!(handle, "--- Application Stopped ---");
            let _ = handle.sync_all();
        }
    }
}

/// Installs the global subscriber.
///
/// Terminal output goes through the indicatif writer so spinners and log lines
/// never tear each other apart. When `log_file` is given, events (not the
/// decorated terminal prints) are appended to it as plain text. A log file
/// that cannot be opened is reported as a warning and left out.
pub fn init_logging(log_file: Option<&Path>, quiet: u8) -> anyhow::Result<LogGuard> {
    let env_filter: EnvFilter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let max_level: Level = match quiet {
        0 => Level::INFO,
        1 => Level::WARN,
        _ => Level::ERROR,
    };

    let indicatif_layer = IndicatifLayer::new();

    let terminal_layer = tracing_fmt::layer()
        .event_format(NetcheckFormatter)
        .with_writer(indicatif_layer.get_stderr_writer())
        .with_filter(filter_fn(move |meta| {
            meta.target() == PRINT_TARGET
                || (meta.target() == SUCCESS_TARGET && quiet < 2)
                || *meta.level() <= max_level
        }));

    let (file, file_error): (Option<Arc<File>>, Option<anyhow::Error>) = match log_file.map(open_log_file) {
        Some(Ok(file)) => (Some(Arc::new(file)), None),
        Some(Err(err)) => (None, Some(err)),
        None => (None, None),
    };

    let file_layer = file.clone().map(|file| {
        tracing_fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_filter(filter_fn(|meta| meta.target() != PRINT_TARGET))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(terminal_layer)
        .with(file_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .try_init()
        .context("failed to install the log subscriber")?;

    if let Some(err) = file_error {
        warn!("Logging to the terminal only: {err:#}");
    }

    Ok(LogGuard { file })
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let mut file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    writeln!(file, "--- Application Started ---")?;
    Ok(file)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
