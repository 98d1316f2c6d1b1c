use super::fetch::Payload;
use crate::model::{AggregateStats, UserRecord};
use serde::Deserialize;
use serde_json::Value;

pub const ALL_USERS_NAME: &str = "All Users";
const DEFAULT_LOW_BPM: f64 = 50.0;

/// Rows to show for the last payload.
///
/// An array is a user list and is shown as-is. An object carrying `high_bpm`
/// is the cross-user aggregate and collapses into a single "All Users" row.
/// Any other document, or nothing fetched yet, shows nothing.
pub fn display_users(payload: Option<&Payload>) -> Vec<UserRecord> {
    match payload {
        Some(Value::Array(records)) => records
            .iter()
            .filter_map(|r| UserRecord::deserialize(r).ok())
            .collect(),
        Some(doc) if doc.is_object() && doc.get("high_bpm").is_some() => {
            match AggregateStats::deserialize(doc) {
                Ok(agg) => vec![all_users_row(&agg)],
                Err(_) => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

fn all_users_row(agg: &AggregateStats) -> UserRecord {
    let low_bpm = agg.low_bpm.unwrap_or(DEFAULT_LOW_BPM);
    UserRecord {
        id: 0,
        name: ALL_USERS_NAME.to_string(),
        high_bpm: agg.high_bpm,
        low_bpm,
        avg_bpm: Some(agg.avg_bpm.unwrap_or((agg.high_bpm + low_bpm) / 2.0)),
        avg_confidence: Some(agg.avg_confidence.unwrap_or(0.0)),
        bpm_stddev: Some(agg.bpm_stddev.unwrap_or(0.0)),
        sample_count: None,
        window: None,
        last_updated: None,
    }
}
