use crate::model::{HealthStatus, UserRecord};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

pub const COLUMNS: [&str; 9] = [
    "Name",
    "High BPM",
    "Low BPM",
    "Avg BPM",
    "Avg Confidence",
    "BPM Std Dev",
    "Samples",
    "Window Start",
    "Last Updated",
];

const MISSING: &str = "\u{2014}";

pub const LOADING_MESSAGE: &str = "Loading data...";

const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Message shown when there is nothing to list.
pub fn empty_message(last_searched: &str) -> String {
    let last = last_searched.trim();
    if last.is_empty() {
        "No users available.".to_string()
    } else {
        format!("No {} user available.", last)
    }
}

pub fn health_line(status: HealthStatus) -> String {
    format!("Data Pipeline Health: {}", status)
}

pub fn error_banner(message: &str) -> String {
    format!("Error: {}", message)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// RFC 3339 timestamp in the local time zone. Text that does not parse is
/// shown as sent.
fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &Local)
}

fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

fn or_missing<T>(v: Option<T>, f: impl FnOnce(T) -> String) -> String {
    v.map(f).unwrap_or_else(|| MISSING.to_string())
}

pub fn format_cells(u: &UserRecord) -> [String; 9] {
    [
        u.name.clone(),
        u.high_bpm.to_string(),
        u.low_bpm.to_string(),
        or_missing(u.avg_bpm, |v| format!("{:.1}", v)),
        or_missing(u.avg_confidence, |v| format!("{:.2}", v)),
        or_missing(u.bpm_stddev, |v| v.to_string()),
        or_missing(u.sample_count, group_thousands),
        or_missing(u.window.as_ref(), |w| format_timestamp(&w.start)),
        or_missing(u.last_updated.as_deref(), format_timestamp),
    ]
}

fn pad_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(s, w)| format!("{:<width$}", s.as_ref(), width = *w))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

/// Plain-text table; the focused cell is wrapped in brackets.
pub fn render_table(rows: &[UserRecord], focus: Option<(usize, usize)>) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(r, u)| {
            format_cells(u)
                .into_iter()
                .enumerate()
                .map(|(c, text)| {
                    if focus == Some((r, c)) {
                        format!("[{}]", text)
                    } else {
                        text
                    }
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(pad_row(&COLUMNS, &widths));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &cells {
        out.push(pad_row(row, &widths));
    }
    out.join("\n")
}
