//! Derived counters and display formatting.

use chrono::{DateTime, Duration as ChronoDuration, Local};

use crate::source::{Alert, Connection, Severity, StatusMetrics, SystemStats, Threat};

/// Combined link capacity used to turn throughput into a gauge percentage.
pub const NETWORK_CAPACITY_MBPS: f64 = 2000.0;

/// The four headline stat cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatSlot {
    Threats,
    Alerts,
    Connections,
    Cpu,
}

impl StatSlot {
    pub const ALL: [StatSlot; 4] = [
        StatSlot::Threats,
        StatSlot::Alerts,
        StatSlot::Connections,
        StatSlot::Cpu,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatSlot::Threats => "Threats Detected",
            StatSlot::Alerts => "Active Alerts",
            StatSlot::Connections => "Connections",
            StatSlot::Cpu => "CPU Usage",
        }
    }

    /// Unit suffix shown after the animated value.
    pub fn unit(&self) -> &'static str {
        match self {
            StatSlot::Cpu => "%",
            _ => "",
        }
    }

    /// Current target value for this slot.
    pub fn value(&self, status: &StatusMetrics) -> f64 {
        match self {
            StatSlot::Threats => status.threats_detected as f64,
            StatSlot::Alerts => status.alerts as f64,
            StatSlot::Connections => status.active_connections as f64,
            StatSlot::Cpu => status.system.map_or(0.0, |s| s.cpu_usage),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            StatSlot::Threats => 0,
            StatSlot::Alerts => 1,
            StatSlot::Connections => 2,
            StatSlot::Cpu => 3,
        }
    }
}

/// Host resource gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemMetric {
    Cpu,
    Memory,
    Network,
    Disk,
}

impl SystemMetric {
    pub const ALL: [SystemMetric; 4] = [
        SystemMetric::Cpu,
        SystemMetric::Memory,
        SystemMetric::Network,
        SystemMetric::Disk,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SystemMetric::Cpu => "CPU",
            SystemMetric::Memory => "Memory",
            SystemMetric::Network => "Network",
            SystemMetric::Disk => "Disk",
        }
    }

    /// Percentage in `0..=100`.
    pub fn percent(&self, system: &SystemStats) -> f64 {
        let raw = match self {
            SystemMetric::Cpu => system.cpu_usage,
            SystemMetric::Memory => system.memory_usage,
            SystemMetric::Network => {
                (system.network_in + system.network_out) / NETWORK_CAPACITY_MBPS * 100.0
            }
            SystemMetric::Disk => system.disk_usage,
        };
        if raw.is_finite() {
            raw.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Gauge band for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Load {
    Normal,
    Warning,
    Critical,
}

impl Load {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 80.0 {
            Load::Critical
        } else if percent > 60.0 {
            Load::Warning
        } else {
            Load::Normal
        }
    }
}

/// Threat totals per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_threats(threats: &[Threat]) -> Self {
        let mut counts = Self::default();
        for threat in threats {
            match threat.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Alert totals for the alerts section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertCounts {
    pub unread: usize,
    pub today: usize,
    pub week: usize,
}

impl AlertCounts {
    pub fn from_alerts(alerts: &[Alert], now: DateTime<Local>) -> Self {
        let week_ago = now - ChronoDuration::days(7);
        let today = now.date_naive();

        let mut counts = Self::default();
        for alert in alerts {
            if !alert.acknowledged {
                counts.unread += 1;
            }
            if alert.timestamp.date_naive() == today {
                counts.today += 1;
            }
            if alert.timestamp > week_ago {
                counts.week += 1;
            }
        }
        counts
    }
}

/// Connection totals for the network section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionCounts {
    pub total: usize,
    pub secure: usize,
}

impl ConnectionCounts {
    pub fn from_connections(connections: &[Connection]) -> Self {
        Self {
            total: connections.len(),
            secure: connections.iter().filter(|c| c.is_secure()).count(),
        }
    }
}

/// Format a byte count with a 1024 base, rounded to a whole number.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    format!("{} {}", scaled.round() as u64, UNITS[exp])
}

/// Format a count with thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a throughput in MB/s.
pub fn format_speed(mbps: f64) -> String {
    let mbps = if mbps.is_finite() { mbps.max(0.0) } else { 0.0 };
    format!("{mbps:.1} MB/s")
}
