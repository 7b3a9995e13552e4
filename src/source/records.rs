//! Typed records served by the dashboard backend.
//!
//! The backend is loose about casing (`"HIGH"`, `"High"`, `"Time_Wait"`) and
//! field naming (`local_address` vs. `source`), so enum fields are parsed
//! case-insensitively and structs accept the known aliases.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::Resource;
use crate::error::{FetchError, InvalidRecord};

/// Lowercase and strip separators so `"Time_Wait"` matches `"timewait"`.
fn normalize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Threat and alert severity.
///
/// Ordered from least to most severe so `max()` picks the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Every severity, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Icon shown next to alerts of this severity.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Critical => "⊗",
            Severity::High => "▲",
            Severity::Medium => "ℹ",
            Severity::Low => "✓",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Handling status of a detected threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ThreatStatus {
    Active,
    Blocked,
    Monitoring,
}

impl ThreatStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ThreatStatus::Active => "Active",
            ThreatStatus::Blocked => "Blocked",
            ThreatStatus::Monitoring => "Monitoring",
        }
    }
}

impl FromStr for ThreatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "active" => Ok(ThreatStatus::Active),
            "blocked" => Ok(ThreatStatus::Blocked),
            "monitoring" => Ok(ThreatStatus::Monitoring),
            _ => Err(format!("unknown threat status: {s}")),
        }
    }
}

impl TryFrom<String> for ThreatStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

/// TCP-style connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ConnectionStatus {
    Established,
    Listening,
    TimeWait,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Established => "Established",
            ConnectionStatus::Listening => "Listening",
            ConnectionStatus::TimeWait => "Time Wait",
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "established" => Ok(ConnectionStatus::Established),
            "listening" | "listen" => Ok(ConnectionStatus::Listening),
            "timewait" => Ok(ConnectionStatus::TimeWait),
            _ => Err(format!("unknown connection status: {s}")),
        }
    }
}

impl TryFrom<String> for ConnectionStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

/// Severity level of a system log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRIT",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            _ => Err(format!("unknown log level: {s}")),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 as well as the naive ISO form the backend emits
/// (`2024-05-01T12:34:56.789012`), which is interpreted as local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local.from_local_datetime(&naive).earliest()
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
}

/// A detected threat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Local>,
    pub status: ThreatStatus,
}

/// An observed network connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub protocol: String,
    #[serde(alias = "source", alias = "localAddress")]
    pub local_address: String,
    #[serde(alias = "destination", alias = "remoteAddress")]
    pub remote_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub status: ConnectionStatus,
    #[serde(default, alias = "bytesSent")]
    pub bytes_sent: u64,
    #[serde(default, alias = "bytesReceived")]
    pub bytes_received: u64,
    #[serde(
        default,
        alias = "durationSeconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_seconds: Option<u64>,
}

impl Connection {
    /// Remote endpoint including the port when known.
    pub fn remote_endpoint(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.remote_address, port),
            None => self.remote_address.clone(),
        }
    }

    /// HTTPS by protocol name or by the well-known port.
    pub fn is_secure(&self) -> bool {
        self.protocol.eq_ignore_ascii_case("https") || self.port == Some(443)
    }
}

/// A security alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Local>,
    #[serde(default)]
    pub acknowledged: bool,
}

/// A system log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub source: String,
    pub message: String,
}

/// Host resource usage reported alongside the status counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    #[serde(default, alias = "cpuUsage")]
    pub cpu_usage: f64,
    #[serde(default, alias = "memoryUsage")]
    pub memory_usage: f64,
    #[serde(default, alias = "diskUsage")]
    pub disk_usage: f64,
    #[serde(default, alias = "networkIn")]
    pub network_in: f64,
    #[serde(default, alias = "networkOut")]
    pub network_out: f64,
}

/// Read a counter, flooring negative or fractional values at 0.
fn deserialize_counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(if raw.is_finite() && raw > 0.0 {
        raw.round() as u64
    } else {
        0
    })
}

/// Headline counters from the status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusMetrics {
    #[serde(alias = "threatsDetected", deserialize_with = "deserialize_counter")]
    pub threats_detected: u64,
    #[serde(deserialize_with = "deserialize_counter")]
    pub alerts: u64,
    #[serde(alias = "activeConnections", deserialize_with = "deserialize_counter")]
    pub active_connections: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemStats>,
}

/// Result of decoding a collection payload.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    /// Records that decoded cleanly, in payload order.
    pub records: Vec<T>,
    /// Entries that were dropped.
    pub rejected: Vec<InvalidRecord>,
}

/// Decode an array payload record by record.
///
/// A malformed entry is logged and dropped; the remaining entries are kept.
/// A payload that is not an array at all fails the whole cycle.
pub fn decode_collection<T: DeserializeOwned>(
    resource: Resource,
    payload: Value,
) -> Result<Decoded<T>, FetchError> {
    let Value::Array(items) = payload else {
        return Err(FetchError::Parse(format!(
            "{resource} payload is not an array"
        )));
    };

    let mut records = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                let invalid = InvalidRecord {
                    resource,
                    index,
                    reason: e.to_string(),
                };
                warn!(%resource, index, reason = %invalid.reason, "dropping invalid record");
                rejected.push(invalid);
            }
        }
    }

    Ok(Decoded { records, rejected })
}

/// Decode the status payload.
pub fn decode_status(payload: Value) -> Result<StatusMetrics, FetchError> {
    Ok(serde_json::from_value(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_enum_parsing_is_lenient() {
        assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
        assert_eq!("critical".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!(
            "Time_Wait".parse::<ConnectionStatus>(),
            Ok(ConnectionStatus::TimeWait)
        );
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert!("severe".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low < Severity::Medium);
    }

    #[test]
    fn test_parse_naive_timestamp() {
        let ts = parse_timestamp("2024-05-01T12:34:56.789012").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.minute(), 34);

        assert!(parse_timestamp("2024-05-01T12:34:56").is_some());
        assert!(parse_timestamp("2024-05-01T12:34:56+00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_decode_threats_drops_invalid_entries() {
        let payload = json!([
            {
                "id": 0,
                "type": "Malware",
                "severity": "High",
                "source": "192.168.1.20",
                "timestamp": "2024-05-01T10:00:00.000000",
                "status": "Active"
            },
            {
                "id": 1,
                "type": "DDoS",
                "severity": "Apocalyptic",
                "source": "192.168.1.21",
                "timestamp": "2024-05-01T10:00:00.000000",
                "status": "Blocked"
            },
            {
                "id": 2,
                "type": "Port Scan",
                "severity": "low",
                "source": "192.168.1.22",
                "target": "10.0.0.1",
                "timestamp": "2024-05-01T10:00:01",
                "status": "MONITORING"
            }
        ]);

        let decoded = decode_collection::<Threat>(Resource::Threats, payload).unwrap();
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.records[0].kind, "Malware");
        assert_eq!(decoded.records[1].target.as_deref(), Some("10.0.0.1"));
        assert_eq!(decoded.records[1].status, ThreatStatus::Monitoring);

        assert_eq!(decoded.rejected.len(), 1);
        assert_eq!(decoded.rejected[0].index, 1);
        assert!(decoded.rejected[0].reason.contains("Apocalyptic"));
    }

    #[test]
    fn test_decode_connections_with_backend_aliases() {
        let payload = json!([{
            "id": 4,
            "source": "192.168.4.2",
            "destination": "10.0.3.9",
            "port": 443,
            "protocol": "TCP",
            "status": "Time_Wait",
            "bytes_sent": 1200,
            "bytes_received": 48000
        }]);

        let decoded = decode_collection::<Connection>(Resource::Connections, payload).unwrap();
        let conn = &decoded.records[0];
        assert_eq!(conn.local_address, "192.168.4.2");
        assert_eq!(conn.remote_endpoint(), "10.0.3.9:443");
        assert_eq!(conn.status, ConnectionStatus::TimeWait);
        assert!(conn.is_secure());
        assert!(conn.duration_seconds.is_none());
    }

    #[test]
    fn test_decode_collection_rejects_non_array() {
        let err = decode_collection::<Alert>(Resource::Alerts, json!({"error": "boom"}))
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_decode_status() {
        let status = decode_status(json!({
            "status": "online",
            "uptime": "2h 15m",
            "version": "3.0",
            "threats_detected": 42,
            "active_connections": 120,
            "alerts": 7,
            "system": {
                "cpu_usage": 35.5,
                "memory_usage": 61.0,
                "disk_usage": 12.0,
                "network_in": 300.0,
                "network_out": 150.0
            }
        }))
        .unwrap();

        assert_eq!(status.threats_detected, 42);
        assert_eq!(status.active_connections, 120);
        assert_eq!(status.uptime.as_deref(), Some("2h 15m"));
        assert_eq!(status.system.map(|s| s.cpu_usage), Some(35.5));
    }

    #[test]
    fn test_decode_status_floors_negative_counters() {
        let status = decode_status(json!({
            "threats_detected": -30,
            "alerts": 2.6,
            "active_connections": 5
        }))
        .unwrap();
        assert_eq!(status.threats_detected, 0);
        assert_eq!(status.alerts, 3);
        assert_eq!(status.active_connections, 5);
    }

    #[test]
    fn test_log_level_from_string() {
        assert_eq!(LogLevel::try_from("Error".to_string()), Ok(LogLevel::Error));
        assert!(LogLevel::try_from("loud".to_string()).is_err());
    }

    #[test]
    fn test_decode_status_missing_counters_fails() {
        assert!(decode_status(json!({"status": "online"})).is_err());
    }
}
