use std::path::Path;

use anyhow::Context;
use netcheck_common::config::Config;

use super::ConfigSource;
use super::probe::print_issues;
use crate::terminal::print;

pub fn import(file: &Path, source: &ConfigSource, cfg: &Config) -> anyhow::Result<()> {
    let store = source.open_store()?;
    let registry = store
        .import(file)
        .with_context(|| format!("refusing to import {}", file.display()))?;

    print::header("configuration imported", cfg.quiet);
    print::print_status(format!("Active device file: {}", store.path().display()));
    print::print_status(format!(
        "{} device(s), {} interface(s) skipped",
        registry.devices().len(),
        registry.issues().len()
    ));
    print_issues(&registry);
    Ok(())
}
