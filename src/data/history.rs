//! Historical status samples for sparklines and time-series charts.

use std::collections::{BTreeMap, VecDeque};

use super::summary::{StatSlot, SystemMetric};
use crate::source::StatusMetrics;
use crate::state::Snapshot;

/// Samples kept per stat card sparkline.
pub const STAT_HISTORY: usize = 20;

/// Samples kept per system metric time series.
pub const SYSTEM_HISTORY: usize = 50;

/// Tracks recent status values for trending.
///
/// Each status snapshot is recorded at most once, keyed by its sequence
/// number, so calling [`record`](History::record) every frame is fine.
#[derive(Debug, Clone, Default)]
pub struct History {
    stats: BTreeMap<StatSlot, VecDeque<f64>>,
    system: BTreeMap<SystemMetric, VecDeque<f64>>,
    last_seq: u64,
}

fn push_capped(series: &mut VecDeque<f64>, value: f64, cap: usize) {
    series.push_back(value);
    while series.len() > cap {
        series.pop_front();
    }
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status snapshot. Returns `false` if it was already recorded.
    pub fn record(&mut self, snapshot: &Snapshot<StatusMetrics>) -> bool {
        if snapshot.seq() <= self.last_seq {
            return false;
        }
        self.last_seq = snapshot.seq();
        self.push(snapshot);
        true
    }

    fn push(&mut self, status: &StatusMetrics) {
        for slot in StatSlot::ALL {
            let series = self.stats.entry(slot).or_default();
            push_capped(series, slot.value(status), STAT_HISTORY);
        }

        // Older backends omit the system block; leave those series alone.
        if let Some(system) = &status.system {
            for metric in SystemMetric::ALL {
                let series = self.system.entry(metric).or_default();
                push_capped(series, metric.percent(system), SYSTEM_HISTORY);
            }
        }
    }

    /// Sequence number of the last recorded snapshot.
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Samples for a stat card, oldest first.
    pub fn stat_series(&self, slot: StatSlot) -> Vec<f64> {
        self.stats
            .get(&slot)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Percent samples for a system metric, oldest first.
    pub fn system_series(&self, metric: SystemMetric) -> Vec<f64> {
        self.system
            .get(&metric)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Change between the two most recent samples of a stat.
    ///
    /// Returns None if there's not enough history.
    pub fn delta(&self, slot: StatSlot) -> Option<f64> {
        let series = self.stats.get(&slot)?;
        if series.len() < 2 {
            return None;
        }
        let current = *series.back()?;
        let previous = *series.get(series.len() - 2)?;
        Some(current - previous)
    }
}
