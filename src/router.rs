//! Section navigation.

use std::collections::BTreeMap;

use tracing::info;

use crate::source::Resource;
use crate::surface::SurfaceId;
use crate::viz::ids;

/// The current section/tab in the TUI.
///
/// Stat detail and help are overlays rather than sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    /// Overview: stat cards, radar, live lists and system health.
    Dashboard,
    /// Threat table with per-severity counts.
    Threats,
    /// Connections and topology.
    Network,
    /// Alert feed.
    Alerts,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Threats,
        Section::Network,
        Section::Alerts,
    ];

    /// Cycle to the next section.
    pub fn next(self) -> Self {
        match self {
            Section::Dashboard => Section::Threats,
            Section::Threats => Section::Network,
            Section::Network => Section::Alerts,
            Section::Alerts => Section::Dashboard,
        }
    }

    /// Cycle to the previous section.
    pub fn prev(self) -> Self {
        match self {
            Section::Dashboard => Section::Alerts,
            Section::Threats => Section::Dashboard,
            Section::Network => Section::Threats,
            Section::Alerts => Section::Network,
        }
    }

    /// Returns the display label for this section.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Threats => "Threats",
            Section::Network => "Network",
            Section::Alerts => "Alerts",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Section::Dashboard => 0,
            Section::Threats => 1,
            Section::Network => 2,
            Section::Alerts => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Resources reloaded when the section is entered.
    pub fn resources(&self) -> &'static [Resource] {
        match self {
            Section::Dashboard => &[
                Resource::Status,
                Resource::Threats,
                Resource::Alerts,
                Resource::Connections,
                Resource::Logs,
            ],
            Section::Threats => &[Resource::Threats],
            Section::Network => &[Resource::Connections],
            Section::Alerts => &[Resource::Alerts],
        }
    }

    /// Animated surfaces that only run while the section is shown.
    pub fn exclusive_surfaces(&self) -> &'static [SurfaceId] {
        match self {
            Section::Dashboard => &[
                ids::RADAR,
                ids::NETWORK_MAP,
                ids::PERFORMANCE,
                ids::THREAT_SPARK,
                ids::ALERT_SPARK,
                ids::CONNECTION_SPARK,
                ids::CPU_SPARK,
            ],
            Section::Network => &[ids::TOPOLOGY],
            Section::Threats | Section::Alerts => &[],
        }
    }
}

/// Setup plan for a section change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Section left, `None` on the first activation.
    pub from: Option<Section>,
    pub to: Section,
    /// Loops to stop; they stay registered.
    pub stop: &'static [SurfaceId],
    /// Loops to ensure are running.
    pub ensure: &'static [SurfaceId],
    /// Pollers to refresh.
    pub refresh: &'static [Resource],
    /// Whether `to` has never been active before.
    pub first_visit: bool,
}

/// Section state machine.
#[derive(Debug, Clone)]
pub struct SectionRouter {
    current: Section,
    active: bool,
    activations: BTreeMap<Section, u32>,
}

impl Default for SectionRouter {
    fn default() -> Self {
        Self::new(Section::Dashboard)
    }
}

impl SectionRouter {
    /// Router positioned on `initial`. Nothing is active until the first
    /// [`navigate`](Self::navigate).
    pub fn new(initial: Section) -> Self {
        Self {
            current: initial,
            active: false,
            activations: BTreeMap::new(),
        }
    }

    pub fn current(&self) -> Section {
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Times `section` has been entered.
    pub fn activations(&self, section: Section) -> u32 {
        self.activations.get(&section).copied().unwrap_or(0)
    }

    /// Activate the initial section. Returns `None` if already active.
    pub fn activate(&mut self) -> Option<Transition> {
        self.navigate(self.current)
    }

    /// Switch to `to`. Returns `None` when `to` is already the active section.
    pub fn navigate(&mut self, to: Section) -> Option<Transition> {
        if self.active && self.current == to {
            return None;
        }

        let from = self.active.then_some(self.current);
        let count = self.activations.entry(to).or_insert(0);
        *count += 1;
        let first_visit = *count == 1;

        self.current = to;
        self.active = true;

        info!(from = ?from, to = to.label(), "section changed");
        Some(Transition {
            from,
            to,
            stop: from.map(|s| s.exclusive_surfaces()).unwrap_or_default(),
            ensure: to.exclusive_surfaces(),
            refresh: to.resources(),
            first_visit,
        })
    }

    pub fn next(&mut self) -> Option<Transition> {
        self.navigate(self.current.next())
    }

    pub fn prev(&mut self) -> Option<Transition> {
        self.navigate(self.current.prev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_cycle() {
        let mut section = Section::Dashboard;
        for _ in 0..4 {
            section = section.next();
        }
        assert_eq!(section, Section::Dashboard);
        assert_eq!(Section::Dashboard.prev(), Section::Alerts);
        assert_eq!(Section::from_index(2), Some(Section::Network));
        assert_eq!(Section::from_index(4), None);
    }

    #[test]
    fn test_first_activation() {
        let mut router = SectionRouter::default();
        assert!(!router.is_active());

        let t = router.activate().unwrap();
        assert_eq!(t.from, None);
        assert_eq!(t.to, Section::Dashboard);
        assert!(t.stop.is_empty());
        assert_eq!(t.ensure.len(), 7);
        assert_eq!(t.refresh.len(), 5);
        assert!(t.first_visit);

        assert!(router.activate().is_none());
    }

    #[test]
    fn test_navigate_same_section_is_noop() {
        let mut router = SectionRouter::default();
        router.activate();

        assert!(router.navigate(Section::Threats).is_some());
        assert!(router.navigate(Section::Threats).is_none());
        assert_eq!(router.activations(Section::Threats), 1);
    }

    #[test]
    fn test_leaving_dashboard_stops_its_loops() {
        let mut router = SectionRouter::default();
        router.activate();

        let t = router.navigate(Section::Network).unwrap();
        assert_eq!(t.from, Some(Section::Dashboard));
        assert!(t.stop.contains(&ids::RADAR));
        assert_eq!(t.ensure, &[ids::TOPOLOGY]);
        assert_eq!(t.refresh, &[Resource::Connections]);

        let back = router.prev().unwrap();
        assert_eq!(back.to, Section::Threats);
        assert_eq!(back.stop, &[ids::TOPOLOGY]);

        let again = router.prev().unwrap();
        assert_eq!(again.to, Section::Dashboard);
        assert!(!again.first_visit);
        assert_eq!(router.activations(Section::Dashboard), 2);
    }
}
