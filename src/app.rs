//! Application state and navigation logic.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::animation::{FrameContext, FrameTime, LoopRegistry};
use crate::animator::ValueAnimator;
use crate::config::DashboardConfig;
use crate::data::{write_export, History, StatSlot};
use crate::poller::{resource_poller, PollerRegistry};
use crate::router::{Section, SectionRouter, Transition};
use crate::source::{DataProvider, Resource};
use crate::state::SharedState;
use crate::surface::{SurfaceId, SurfaceRegistry};
use crate::ui::Theme;
use crate::viz::timeseries::DetailScene;
use crate::viz::{ids, scene_for};

/// Messages cycled on the splash screen.
pub const SPLASH_MESSAGES: [&str; 6] = [
    "Initializing Threat Intelligence Systems...",
    "Scanning Network Perimeter...",
    "Loading Security Protocols...",
    "Establishing Secure Connection...",
    "Activating Defense Systems...",
    "System Ready - Welcome to NetSecure Elite",
];

/// How long each splash message stays up.
pub const SPLASH_MESSAGE_INTERVAL: Duration = Duration::from_millis(500);

/// How long a temporary status message stays in the status bar.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Row caps for the section lists.
pub const THREAT_ROWS: usize = 20;
pub const CONNECTION_ROWS: usize = 20;
pub const ALERT_ROWS: usize = 50;

/// Default file written by the export key.
pub const EXPORT_FILE: &str = "netsecure_export.json";

/// Main application state.
///
/// Owns everything the dashboard mutates: the shared snapshots, the loop and
/// poller registries, the counter animator and the section router. All of it
/// is driven from the UI thread; only the pollers run on the runtime.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    /// Full-screen particle backdrop instead of the sections.
    pub show_backdrop: bool,
    /// Stat card whose detail overlay is open.
    pub detail: Option<StatSlot>,
    /// Stat card under the cursor on the dashboard.
    pub selected_stat: StatSlot,
    /// Selected row in the current section's table.
    pub selected_row: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,

    config: DashboardConfig,
    provider: Arc<dyn DataProvider>,
    state: SharedState,
    history: History,
    router: SectionRouter,
    loops: LoopRegistry,
    pollers: PollerRegistry,
    surfaces: SurfaceRegistry,
    animator: ValueAnimator<StatSlot>,
    epoch: Instant,
    splash_dismissed: bool,
}

impl App {
    /// Create a new App with the given configuration and data provider.
    pub fn new(config: DashboardConfig, provider: Arc<dyn DataProvider>) -> Self {
        Self::with_theme(config, provider, Theme::auto_detect())
    }

    pub fn with_theme(config: DashboardConfig, provider: Arc<dyn DataProvider>, theme: Theme) -> Self {
        let animator = ValueAnimator::new(config.animation.steps, config.step_interval());
        Self {
            running: true,
            show_help: false,
            show_backdrop: false,
            detail: None,
            selected_stat: StatSlot::Threats,
            selected_row: 0,
            theme,
            status_message: None,
            config,
            provider,
            state: SharedState::new(),
            history: History::new(),
            router: SectionRouter::default(),
            loops: LoopRegistry::new(),
            pollers: PollerRegistry::new(),
            surfaces: SurfaceRegistry::new(),
            animator,
            epoch: Instant::now(),
            splash_dismissed: false,
        }
    }

    /// Start the pollers and the global backdrop, then enter the initial
    /// section. Must be called inside a tokio runtime. Calling it again is a
    /// no-op.
    pub fn start(&mut self) {
        let interval = self.config.refresh_interval();
        for resource in Resource::ALL {
            let provider = Arc::clone(&self.provider);
            let state = self.state.clone();
            self.pollers
                .ensure(resource, || resource_poller(resource, provider, state, interval));
        }

        let render = &self.config.render;
        self.loops.ensure(ids::BACKDROP, || scene_for(ids::BACKDROP, render));

        if let Some(transition) = self.router.activate() {
            self.apply_transition(transition);
        }
        info!(source = self.provider.description(), "dashboard started");
    }

    /// Returns a description of the current data provider.
    pub fn source_description(&self) -> &str {
        self.provider.description()
    }

    pub fn section(&self) -> Section {
        self.router.current()
    }

    /// Switch to a specific section.
    pub fn navigate(&mut self, section: Section) {
        if let Some(transition) = self.router.navigate(section) {
            self.apply_transition(transition);
        }
    }

    /// Switch to the next section (cycles through Dashboard → Alerts).
    pub fn next_section(&mut self) {
        if let Some(transition) = self.router.next() {
            self.apply_transition(transition);
        }
    }

    /// Switch to the previous section.
    pub fn prev_section(&mut self) {
        if let Some(transition) = self.router.prev() {
            self.apply_transition(transition);
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        if transition.from == Some(Section::Dashboard) {
            self.close_detail();
        }
        for &surface in transition.stop {
            if !transition.ensure.contains(&surface) {
                self.loops.stop(surface);
            }
        }

        let render = &self.config.render;
        for &surface in transition.ensure {
            self.loops.ensure(surface, || scene_for(surface, render));
        }

        // The pollers' own initial cycle covers the first activation.
        if transition.from.is_some() {
            for &resource in transition.refresh {
                self.pollers.refresh(resource);
            }
        }
        self.selected_row = 0;
    }

    /// Pull the latest status into the history and retarget the counters.
    ///
    /// Returns `true` if a new status snapshot was seen.
    pub fn sync_data(&mut self, now: Instant) -> bool {
        let Some(status) = self.state.status().latest() else {
            return false;
        };
        if !self.history.record(&status) {
            return false;
        }
        for slot in StatSlot::ALL {
            self.animator.retarget(slot, slot.value(&status), now);
        }
        debug!(seq = status.seq(), "status synced");
        true
    }

    /// Advance one display frame.
    ///
    /// `layout` lists the surfaces on screen with their pixel sizes. Returns
    /// how many surfaces were repainted.
    pub fn frame(&mut self, now: Instant, layout: &[(SurfaceId, f64, f64)]) -> usize {
        self.surfaces.sync(layout.iter().copied());
        self.sync_data(now);
        self.animator.advance(now);

        let ctx = FrameContext {
            time: FrameTime::new(self.epoch, now),
            state: &self.state,
            history: &self.history,
        };
        self.loops.frame(&mut self.surfaces, &ctx)
    }

    /// Request an out-of-band cycle from every poller.
    pub fn refresh_all(&mut self) {
        self.pollers.refresh_all();
        self.set_status_message("Refreshing all data".to_string());
    }

    /// Open the detail overlay for a stat card.
    pub fn open_detail(&mut self, slot: StatSlot) {
        if self.section() != Section::Dashboard {
            return;
        }
        self.detail = Some(slot);
        self.loops.start(ids::DETAIL, Box::new(DetailScene::new(slot)));
    }

    /// Close the detail overlay if open.
    pub fn close_detail(&mut self) {
        if self.detail.take().is_some() {
            self.loops.stop(ids::DETAIL);
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_backdrop(&mut self) {
        self.show_backdrop = !self.show_backdrop;
    }

    /// Write the current snapshots to `path`.
    pub fn export(&self, path: &Path) -> Result<()> {
        write_export(&self.state, path)
    }

    /// Whether the splash screen is still up.
    pub fn splash_active(&self, now: Instant) -> bool {
        !self.splash_dismissed
            && now.saturating_duration_since(self.epoch) < self.config.splash_duration()
    }

    /// Loading message for the splash screen at `now`.
    pub fn splash_message(&self, now: Instant) -> &'static str {
        let elapsed = now.saturating_duration_since(self.epoch);
        let index = (elapsed.as_millis() / SPLASH_MESSAGE_INTERVAL.as_millis()) as usize;
        SPLASH_MESSAGES[index.min(SPLASH_MESSAGES.len() - 1)]
    }

    pub fn dismiss_splash(&mut self) {
        self.splash_dismissed = true;
    }

    /// Time since the app was created.
    pub fn uptime(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.epoch)
    }

    /// Seconds since the last status snapshot, if one has arrived.
    pub fn last_update_secs(&self, now: Instant) -> Option<f64> {
        let status = self.state.status().latest()?;
        Some(now.saturating_duration_since(status.published_at()).as_secs_f64())
    }

    /// First fetch error among the resources the current section shows.
    pub fn section_error(&self) -> Option<(Resource, String)> {
        self.section()
            .resources()
            .iter()
            .find_map(|&r| self.pollers.last_error(r).map(|e| (r, e.to_string())))
    }

    /// Number of selectable rows in the current section.
    pub fn row_count(&self) -> usize {
        match self.section() {
            Section::Dashboard => StatSlot::ALL.len(),
            Section::Threats => self
                .state
                .threats()
                .latest()
                .map_or(0, |s| s.len().min(THREAT_ROWS)),
            Section::Network => self
                .state
                .connections()
                .latest()
                .map_or(0, |s| s.len().min(CONNECTION_ROWS)),
            Section::Alerts => self
                .state
                .alerts()
                .latest()
                .map_or(0, |s| s.len().min(ALERT_ROWS)),
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        if self.section() == Section::Dashboard {
            let next = (self.selected_stat.index() + 1) % StatSlot::ALL.len();
            self.selected_stat = StatSlot::ALL[next];
            return;
        }
        let max = self.row_count().saturating_sub(1);
        self.selected_row = (self.selected_row + 1).min(max);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        if self.section() == Section::Dashboard {
            let len = StatSlot::ALL.len();
            let prev = (self.selected_stat.index() + len - 1) % len;
            self.selected_stat = StatSlot::ALL[prev];
            return;
        }
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Selected row, clamped to what is currently loaded.
    pub fn clamped_row(&self) -> usize {
        self.selected_row.min(self.row_count().saturating_sub(1))
    }

    /// Signal the application to quit and stop every background task.
    pub fn quit(&mut self) {
        self.running = false;
        self.pollers.stop_all();
    }

    /// Get breadcrumb trail for current navigation.
    pub fn breadcrumb(&self) -> String {
        let mut parts = vec![self.section().label()];
        if let Some(slot) = self.detail {
            parts.push(slot.label());
        }
        parts.join(" > ")
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn animator(&self) -> &ValueAnimator<StatSlot> {
        &self.animator
    }

    pub fn loops(&self) -> &LoopRegistry {
        &self.loops
    }

    pub fn pollers(&self) -> &PollerRegistry {
        &self.pollers
    }

    pub fn surfaces(&self) -> &SurfaceRegistry {
        &self.surfaces
    }
}
