use serde::{Deserialize, Serialize};
use std::fmt;

/// Time span a user's samples were summarized over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateWindow {
    pub start: String,
    pub end: String,
}

/// One row of aggregated heart-rate telemetry for a named user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub high_bpm: f64,
    pub low_bpm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_bpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_stddev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<AggregateWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Contents of `data-all.json`: statistics across every user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub high_bpm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_bpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_bpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm_stddev: Option<f64>,
}

/// Pipeline health as reported by `/pipeline-health`.
///
/// `Unknown` only exists on the client side, when the probe request itself
/// could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Passing,
    Failing,
    #[default]
    Unknown,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Passing => "passing",
            HealthStatus::Failing => "failing",
            HealthStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_record_optional_fields_may_be_absent() {
        let v = json!({ "id": 7, "name": "Alice", "high_bpm": 120, "low_bpm": 60 });
        let u: UserRecord = serde_json::from_value(v).expect("parse minimal record");
        assert_eq!(u.id, 7);
        assert_eq!(u.avg_bpm, None);
        assert_eq!(u.window, None);

        // absent fields stay absent when written back out
        let out = serde_json::to_value(&u).expect("serialize");
        assert!(out.get("avg_bpm").is_none());
        assert!(out.get("last_updated").is_none());
    }

    #[test]
    fn user_record_reads_window_and_counts() {
        let v = json!({
            "id": 1,
            "name": "Bob",
            "high_bpm": 110.5,
            "low_bpm": 55,
            "sample_count": 80,
            "window": { "start": "2024-01-02T00:00:00Z", "end": "2024-01-02T01:00:00Z" },
            "last_updated": "2024-01-02T00:00:00Z"
        });
        let u: UserRecord = serde_json::from_value(v).expect("parse full record");
        assert_eq!(u.sample_count, Some(80));
        assert_eq!(u.window.expect("window").end, "2024-01-02T01:00:00Z");
    }

    #[test]
    fn health_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(HealthStatus::Failing).unwrap(),
            json!("failing")
        );
        assert_eq!(HealthStatus::default(), HealthStatus::Unknown);
        assert_eq!(HealthStatus::Passing.to_string(), "passing");
    }
}
