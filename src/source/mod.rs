//! Data provider abstraction for the dashboard backend.
//!
//! The backend exposes five read-only resources (threats, connections,
//! alerts, logs, status). A [`DataProvider`] fetches the raw JSON payload for
//! one resource; [`records`] turns that payload into typed records, dropping
//! malformed entries instead of rejecting the whole collection.

mod directory;
mod http;
pub mod records;

pub use directory::DirectoryProvider;
pub use http::{HttpProvider, HttpProviderBuilder, DEFAULT_BASE_URL};
pub use records::{
    decode_collection, decode_status, Alert, Connection, ConnectionStatus, Decoded, LogEntry,
    LogLevel, Severity, StatusMetrics, SystemStats, Threat, ThreatStatus,
};

use std::fmt::{self, Debug};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::FetchError;

/// One of the resources served by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Threats,
    Connections,
    Alerts,
    Logs,
    Status,
}

impl Resource {
    /// Every resource, in refresh order.
    pub const ALL: [Resource; 5] = [
        Resource::Status,
        Resource::Threats,
        Resource::Alerts,
        Resource::Connections,
        Resource::Logs,
    ];

    /// Short lowercase name, used for file names and log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Threats => "threats",
            Resource::Connections => "connections",
            Resource::Alerts => "alerts",
            Resource::Logs => "logs",
            Resource::Status => "status",
        }
    }

    /// Path of the resource on the backend API.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Threats => "/api/threats",
            Resource::Connections => "/api/connections",
            Resource::Alerts => "/api/alerts",
            Resource::Logs => "/api/logs",
            Resource::Status => "/api/status",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for fetching raw resource payloads from the backend.
///
/// Implementations must be cheap to share between pollers; each poller holds
/// an `Arc<dyn DataProvider>` and calls [`fetch`](DataProvider::fetch) once
/// per cycle.
///
/// # Example
///
/// ```no_run
/// use netsecure_tui::source::{DataProvider, DirectoryProvider, Resource};
///
/// # tokio_test::block_on(async {
/// let provider = DirectoryProvider::new("fixtures");
/// let payload = provider.fetch(Resource::Threats).await;
/// # });
/// ```
#[async_trait]
pub trait DataProvider: Send + Sync + Debug {
    /// Fetch the current JSON payload for `resource`.
    async fn fetch(&self, resource: Resource) -> Result<Value, FetchError>;

    /// Returns a human-readable description of the provider.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::Threats.path(), "/api/threats");
        assert_eq!(Resource::Status.path(), "/api/status");
        assert_eq!(Resource::Logs.to_string(), "logs");
    }

    #[test]
    fn test_all_resources_unique() {
        let mut names: Vec<_> = Resource::ALL.iter().map(Resource::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
    }
}
