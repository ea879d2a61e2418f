//! Log line formatting

use chrono::{DateTime, Utc};
use std::str::FromStr;

/// How log lines are rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    /// Example: {"timestamp":"2024-01-15T10:30:00+00:00","level":"INFO","target":"invoicer_core::auth","message":"User logged in"}
    Json,

    /// Example: 2024-01-15 10:30:00.000 INFO  [invoicer_core::auth] User logged in
    Human,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "human" => Ok(LogFormat::Human),
            other => anyhow::bail!("unknown log format: {}", other),
        }
    }
}

/// One record, detached from `log::Record` lifetimes
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn from_record(record: &log::Record<'_>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        }
    }
}

impl LogFormat {
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => format_json(entry),
            LogFormat::Human => format_human(entry),
        }
    }
}

fn format_json(entry: &LogEntry) -> String {
    serde_json::json!({
        "timestamp": entry.timestamp.to_rfc3339(),
        "level": entry.level.as_str(),
        "target": entry.target,
        "message": entry.message,
    })
    .to_string()
}

fn format_human(entry: &LogEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
    format!("{} {:5} [{}] {}", timestamp, entry.level.as_str(), entry.target, entry.message)
}
