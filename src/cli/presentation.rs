//! CLI presentation: text and JSON formatting of config views.

use crate::state::UpdateReport;
use crate::views::{ScheduledQuery, WatchedFiles};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

pub fn format_schedule(queries: &[ScheduledQuery]) -> String {
    if queries.is_empty() {
        return "No scheduled queries.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Interval (s)", "Query"]);
    for query in queries {
        table.add_row(vec![
            query.name.clone(),
            query.interval.to_string(),
            query.query.clone(),
        ]);
    }
    table.to_string()
}

pub fn format_watched_files(files: &WatchedFiles) -> String {
    if files.is_empty() {
        return "No watched files.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Category", "Patterns"]);
    for (category, patterns) in files {
        let joined: Vec<&str> = patterns.iter().map(String::as_str).collect();
        table.add_row(vec![category.clone(), joined.join("\n")]);
    }
    table.to_string()
}

/// One-line summary of a load/update, plus any warnings
pub fn format_report(report: &UpdateReport) -> String {
    let mut out = format!(
        "digest {} (generation {}, {} source(s){})",
        report.digest,
        report.generation,
        report.applied.len(),
        if report.changed { ", changed" } else { "" }
    );
    for warning in &report.warnings {
        out.push_str(&format!("\n  warning: {}", warning));
    }
    out
}
