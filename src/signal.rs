//! Trading signal record and the JSON file source it is read from.
//!
//! Signals are produced elsewhere; this crate only reads the latest one.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: String,
    pub symbol: String,
    pub side: Side,
    pub confidence: f64,           // 0.0 ..= 1.0
    pub entry: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub risk_reward: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid signal in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse a signal file
pub async fn load_signal(path: &Path) -> Result<Signal, SignalError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SignalError::Read { path: path.to_path_buf(), source })?;

    parse_signal(&content).map_err(|source| SignalError::Parse { path: path.to_path_buf(), source })
}

pub fn parse_signal(content: &str) -> Result<Signal, serde_json::Error> {
    serde_json::from_str(content)
}

/// Accepts epoch milliseconds or an RFC 3339 string
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Text(String),
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", ms))),
        RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom),
    }
}
