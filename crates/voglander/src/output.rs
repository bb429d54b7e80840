//! Rendering for `--output` plus the stderr status helpers.
//!
//! Command results go to stdout; success/notice lines and the spinner go to
//! stderr.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

// ── Status lines ─────────────────────────────────────────────────────

/// `auto` colors only an interactive stderr without `NO_COLOR`.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Print a success line to stderr unless `--quiet`.
pub fn success(global: &GlobalOpts, message: &str) {
    if global.quiet {
        return;
    }
    if should_color(&global.color) {
        eprintln!("{} {message}", "✓".green().bold());
    } else {
        eprintln!("✓ {message}");
    }
}

/// Print a warning line to stderr unless `--quiet`.
pub fn notice(global: &GlobalOpts, message: &str) {
    if global.quiet {
        return;
    }
    if should_color(&global.color) {
        eprintln!("{} {message}", "!".yellow().bold());
    } else {
        eprintln!("! {message}");
    }
}

// ── Spinner ──────────────────────────────────────────────────────────

/// Spinner on stderr for the duration of a request. Hidden when quiet or
/// when stderr is not a terminal.
pub fn spinner(global: &GlobalOpts, message: &str) -> ProgressBar {
    if global.quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

// ── Rendering ────────────────────────────────────────────────────────

/// JSON and YAML are the same for lists and single items; `None` means the
/// caller renders the human formats itself.
fn render_structured<T: Serialize + ?Sized>(format: &OutputFormat, data: &T) -> Option<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(data)
            .map(|y| y.trim_end().to_owned())
            .map_err(|e| e.to_string()),
        OutputFormat::Table | OutputFormat::Plain => return None,
    };
    Some(text.unwrap_or_else(|e| format!("error: cannot serialize output: {e}")))
}

/// Records as a rounded table (`to_row`), or one `key` per line for plain.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    key: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    if let Some(text) = render_structured(format, data) {
        return text;
    }
    if matches!(format, OutputFormat::Plain) {
        return data.iter().map(key).collect::<Vec<_>>().join("\n");
    }
    let rows: Vec<R> = data.iter().map(to_row).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One record: `detail` text in table mode, `key` in plain mode.
pub fn render_single<T: Serialize>(
    format: &OutputFormat,
    data: &T,
    detail: impl Fn(&T) -> String,
    key: impl Fn(&T) -> String,
) -> String {
    render_structured(format, data).unwrap_or_else(|| match format {
        OutputFormat::Plain => key(data),
        _ => detail(data),
    })
}

/// Write to stdout. Nothing is printed when quiet or empty.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let _ = writeln!(io::stdout().lock(), "{output}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: u32,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: u32,
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: 1, name: "gate" }, Item { id: 2, name: "lobby" }]
    }

    fn row(i: &Item) -> ItemRow {
        ItemRow {
            id: i.id,
            name: i.name,
        }
    }

    #[test]
    fn list_formats() {
        let data = items();

        let table = render_list(&OutputFormat::Table, &data, row, |i| i.id.to_string());
        assert!(table.contains("ID"));
        assert!(table.contains("lobby"));
        assert!(table.starts_with('╭'));

        let compact = render_list(&OutputFormat::JsonCompact, &data, row, |i| i.id.to_string());
        assert_eq!(compact, r#"[{"id":1,"name":"gate"},{"id":2,"name":"lobby"}]"#);

        let plain = render_list(&OutputFormat::Plain, &data, row, |i| i.name.to_owned());
        assert_eq!(plain, "gate\nlobby");

        let yaml = render_list(&OutputFormat::Yaml, &data, row, |i| i.id.to_string());
        assert_eq!(yaml, "- id: 1\n  name: gate\n- id: 2\n  name: lobby");
    }

    #[test]
    fn single_uses_detail_fn_for_table() {
        let item = Item { id: 9, name: "x" };
        let out = render_single(
            &OutputFormat::Table,
            &item,
            |i| format!("ID: {}", i.id),
            |i| i.id.to_string(),
        );
        assert_eq!(out, "ID: 9");
    }

    #[test]
    fn never_color_overrides_terminal() {
        assert!(!should_color(&ColorMode::Never));
        assert!(should_color(&ColorMode::Always));
    }
}
