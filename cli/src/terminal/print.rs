//! Decorated terminal output.
//!
//! Everything here is routed through `tracing` under [`PRINT_TARGET`], so the
//! formatter prints it verbatim above any spinner and the file layer skips it.

use colored::*;
use tracing::info;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "netcheck::print";

#[macro_export]
macro_rules! nprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

/// `────⟦ TITLE ⟧────`, hidden in quiet mode.
pub fn header(title: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }
    let label: ColoredString = format!("⟦ {} ⟧", title.to_uppercase()).bright_green();
    print(&rule('─', Some(label)));
}

pub fn fat_separator() {
    print(&rule('═', None));
}

/// A full-width line of `fill`, with `label` centred in it.
fn rule(fill: char, label: Option<ColoredString>) -> String {
    let label_width: usize = label
        .as_ref()
        .map_or(0, |label| console::measure_text_width(&label.to_string()));
    let remaining: usize = TOTAL_WIDTH.saturating_sub(label_width);
    let left: String = fill.to_string().repeat(remaining / 2);
    let right: String = fill.to_string().repeat(remaining - remaining / 2);

    match label {
        Some(label) => format!("{}{}{}", left.bright_black(), label, right.bright_black()),
        None => format!("{}{}", left.bright_black(), right.bright_black()),
    }
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    print(&format!(
        "{} {}",
        ">".color(colors::SEPARATOR),
        msg.as_ref().color(colors::TEXT_DEFAULT)
    ));
}

/// `[idx] name` line opening a device block.
pub fn tree_head(idx: usize, name: &str) {
    let index: String = format!(
        "{}{}{}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR)
    );
    print(&format!("{index} {}", name.color(colors::PRIMARY)));
}

/// Prints `key....: value` rows under a [`tree_head`], keys padded to the widest one.
pub fn tree_rows(rows: &[(String, ColoredString)]) {
    let key_width: usize = rows
        .iter()
        .map(|(key, _)| console::measure_text_width(key))
        .max()
        .unwrap_or(0);

    for (i, (key, value)) in rows.iter().enumerate() {
        let branch: &str = if i + 1 < rows.len() { "├─" } else { "└─" };
        let dots: String = ".".repeat(key_width - console::measure_text_width(key) + 1);
        print(&format!(
            " {} {}{}{} {}",
            branch.bright_black(),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let pad: String = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{pad}{msg}"));
}

pub fn no_devices(config_path: &str) {
    print(&"No devices configured".red().bold().to_string());
    print_status(format!("Import a device file with `netcheck import <FILE>` (reads {config_path})"));
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
