//! Derived data for display.
//!
//! ## Submodules
//!
//! - [`history`]: fixed-length status history for sparklines and time series
//! - [`summary`]: counters and formatting derived from the current snapshots
//! - [`export`]: JSON export of every snapshot
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot<StatusMetrics>
//!        │
//!        ├──▶ History::record() (once per seq)
//!        │
//!        └──▶ StatSlot::value() ──▶ ValueAnimator targets
//! ```

pub mod export;
pub mod history;
pub mod summary;

pub use export::{build_export, write_export};
pub use history::History;
pub use summary::{
    format_bytes, format_count, format_speed, AlertCounts, ConnectionCounts, Load,
    SeverityCounts, StatSlot, SystemMetric,
};
