//! JSON export of the current snapshots.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::Local;
use serde_json::{json, Map, Value};

use super::summary::{AlertCounts, ConnectionCounts, SeverityCounts};
use crate::state::SharedState;

/// Build the export document from whatever has been published so far.
///
/// Resources that never loaded are exported as `null`.
pub fn build_export(state: &SharedState) -> Result<Value> {
    let mut export = Map::new();
    export.insert("exported_at".to_string(), json!(Local::now().to_rfc3339()));

    let status = state.status().latest();
    let threats = state.threats().latest();
    let connections = state.connections().latest();
    let alerts = state.alerts().latest();
    let logs = state.logs().latest();

    // Summary
    let mut summary = Map::new();
    if let Some(threats) = &threats {
        let counts = SeverityCounts::from_threats(threats);
        summary.insert(
            "threats".to_string(),
            json!({
                "critical": counts.critical,
                "high": counts.high,
                "medium": counts.medium,
                "low": counts.low,
            }),
        );
    }
    if let Some(alerts) = &alerts {
        let counts = AlertCounts::from_alerts(alerts, Local::now());
        summary.insert(
            "alerts".to_string(),
            json!({ "unread": counts.unread, "today": counts.today, "week": counts.week }),
        );
    }
    if let Some(connections) = &connections {
        let counts = ConnectionCounts::from_connections(connections);
        summary.insert(
            "connections".to_string(),
            json!({ "total": counts.total, "secure": counts.secure }),
        );
    }
    export.insert("summary".to_string(), Value::Object(summary));

    export.insert(
        "status".to_string(),
        serde_json::to_value(status.as_deref())?,
    );
    export.insert(
        "threats".to_string(),
        serde_json::to_value(threats.as_deref())?,
    );
    export.insert(
        "connections".to_string(),
        serde_json::to_value(connections.as_deref())?,
    );
    export.insert(
        "alerts".to_string(),
        serde_json::to_value(alerts.as_deref())?,
    );
    export.insert("logs".to_string(), serde_json::to_value(logs.as_deref())?);

    Ok(Value::Object(export))
}

/// Write the export document to `path` as pretty JSON.
pub fn write_export(state: &SharedState, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&build_export(state)?)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Connection, ConnectionStatus, StatusMetrics};
    use tempfile::TempDir;

    #[test]
    fn test_export_empty_state() {
        let state = SharedState::new();
        let export = build_export(&state).unwrap();
        assert!(export["status"].is_null());
        assert!(export["threats"].is_null());
        assert!(export["exported_at"].is_string());
    }

    #[test]
    fn test_write_export() {
        let state = SharedState::new();
        state.status().publish(StatusMetrics {
            threats_detected: 42,
            ..Default::default()
        });
        state.connections().publish(vec![Connection {
            protocol: "HTTPS".to_string(),
            local_address: "192.168.1.10".to_string(),
            remote_address: "10.0.0.8".to_string(),
            port: Some(443),
            status: ConnectionStatus::Established,
            bytes_sent: 10,
            bytes_received: 20,
            duration_seconds: None,
        }]);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        write_export(&state, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["status"]["threats_detected"], 42);
        assert_eq!(value["summary"]["connections"]["secure"], 1);
        assert_eq!(value["connections"][0]["protocol"], "HTTPS");
    }
}
