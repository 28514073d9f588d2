//! CSV and JSON renderings of a run report

use super::aggregator::RunReport;
use crate::core::models::{ActionRecord, RunStatistics};
use crate::utils::error::Result;
use serde::Serialize;

pub const CSV_HEADER: [&str; 7] = [
    "chat_id",
    "title",
    "chat_type",
    "actions_done",
    "status",
    "error",
    "timestamp",
];

const CSV_LINE_END: &str = "\r\n";

/// One row per action record, header first
pub fn render_csv(report: &RunReport) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));
    for action in &report.actions {
        push_row(&mut out, csv_fields(action));
    }
    out
}

fn csv_fields(action: &ActionRecord) -> impl Iterator<Item = String> {
    [
        action.chat_id.to_string(),
        action.title.clone(),
        action.chat_type.as_str().to_string(),
        action.joined_actions(),
        action.status.as_str().to_string(),
        action.error.clone().unwrap_or_default(),
        action.timestamp.clone(),
    ]
    .into_iter()
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let row: Vec<String> = fields.map(|f| escape_field(&f)).collect();
    out.push_str(&row.join(","));
    out.push_str(CSV_LINE_END);
}

/// Quote fields containing a delimiter, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    account_name: &'a str,
    timestamp: &'a str,
    elapsed_time_seconds: f64,
    statistics: &'a RunStatistics,
    actions: &'a [ActionRecord],
}

/// Statistics block plus the ordered action list, pretty printed
pub fn render_json(report: &RunReport) -> Result<String> {
    let view = JsonReport {
        account_name: &report.account_name,
        timestamp: &report.timestamp,
        elapsed_time_seconds: round2(report.elapsed_time_seconds),
        statistics: &report.statistics,
        actions: &report.actions,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
