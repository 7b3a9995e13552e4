//! Frame-driven render loops.
//!
//! Every animated panel is a [`Scene`] wrapped in an [`AnimationLoop`] and
//! keyed by the id of the surface it paints. The main loop calls
//! [`LoopRegistry::frame`] once per display frame; each running loop clears
//! its surface and lets the scene redraw it from the shared state.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::data::History;
use crate::state::SharedState;
use crate::surface::{RenderSurface, SurfaceId, SurfaceRegistry};

/// Time of the frame being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTime {
    pub now: Instant,
    /// Wall-clock time since the dashboard started.
    pub elapsed: Duration,
}

impl FrameTime {
    pub fn new(epoch: Instant, now: Instant) -> Self {
        Self {
            now,
            elapsed: now.saturating_duration_since(epoch),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Everything a scene may read while drawing a frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub time: FrameTime,
    pub state: &'a SharedState,
    pub history: &'a History,
}

/// Per-frame drawing callback for one surface.
///
/// The surface has already been cleared when `tick` runs.
pub trait Scene {
    fn tick(&mut self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>);
}

/// Lifecycle of an [`AnimationLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Drives one scene on one surface.
pub struct AnimationLoop {
    surface: SurfaceId,
    scene: Box<dyn Scene>,
    state: LoopState,
    frames: u64,
}

impl AnimationLoop {
    /// Create an idle loop.
    pub fn new(surface: SurfaceId, scene: Box<dyn Scene>) -> Self {
        Self {
            surface,
            scene,
            state: LoopState::Idle,
            frames: 0,
        }
    }

    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            debug!(surface = self.surface, "animation loop started");
            self.state = LoopState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            debug!(surface = self.surface, "animation loop stopped");
            self.state = LoopState::Idle;
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Frames drawn since the loop was created.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw one frame. Returns `false` if the loop is idle or its surface is
    /// not laid out.
    pub fn frame(&mut self, surfaces: &mut SurfaceRegistry, ctx: &FrameContext<'_>) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(surface) = surfaces.acquire(self.surface) else {
            return false;
        };
        surface.clear();
        self.scene.tick(surface, ctx);
        self.frames += 1;
        true
    }
}

impl fmt::Debug for AnimationLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationLoop")
            .field("surface", &self.surface)
            .field("state", &self.state)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

/// At most one loop per surface.
#[derive(Debug, Default)]
pub struct LoopRegistry {
    loops: BTreeMap<SurfaceId, AnimationLoop>,
}

impl LoopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a running loop exists for `surface`.
    ///
    /// An existing loop is reused (and restarted if idle); `factory` is only
    /// called when there is none, and may decline by returning `None`.
    /// Returns `true` if a loop was created.
    pub fn ensure<F>(&mut self, surface: SurfaceId, factory: F) -> bool
    where
        F: FnOnce() -> Option<Box<dyn Scene>>,
    {
        if let Some(existing) = self.loops.get_mut(surface) {
            existing.start();
            return false;
        }
        let Some(scene) = factory() else {
            return false;
        };
        let mut animation = AnimationLoop::new(surface, scene);
        animation.start();
        self.loops.insert(surface, animation);
        true
    }

    /// Start `scene` on `surface`, replacing any existing loop.
    pub fn start(&mut self, surface: SurfaceId, scene: Box<dyn Scene>) {
        if let Some(mut previous) = self.loops.remove(surface) {
            previous.stop();
        }
        let mut animation = AnimationLoop::new(surface, scene);
        animation.start();
        self.loops.insert(surface, animation);
    }

    /// Stop the loop for `surface`. It stays registered for reuse.
    pub fn stop(&mut self, surface: SurfaceId) {
        if let Some(animation) = self.loops.get_mut(surface) {
            animation.stop();
        }
    }

    /// Draw one frame on every running loop. Returns how many surfaces were
    /// painted.
    pub fn frame(&mut self, surfaces: &mut SurfaceRegistry, ctx: &FrameContext<'_>) -> usize {
        self.loops
            .values_mut()
            .filter_map(|animation| animation.frame(surfaces, ctx).then_some(()))
            .count()
    }

    pub fn get(&self, surface: SurfaceId) -> Option<&AnimationLoop> {
        self.loops.get(surface)
    }

    pub fn is_running(&self, surface: SurfaceId) -> bool {
        self.loops.get(surface).is_some_and(AnimationLoop::is_running)
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn running_count(&self) -> usize {
        self.loops.values().filter(|l| l.is_running()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Point, Rgba};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Draws one line and counts its ticks.
    struct CountingScene {
        ticks: Rc<Cell<u32>>,
    }

    impl Scene for CountingScene {
        fn tick(&mut self, surface: &mut dyn RenderSurface, _frame: &FrameContext<'_>) {
            self.ticks.set(self.ticks.get() + 1);
            surface.line(Point::default(), Point::new(1.0, 1.0), Rgba::rgb(255, 0, 0));
        }
    }

    fn scene(ticks: &Rc<Cell<u32>>) -> Box<dyn Scene> {
        Box::new(CountingScene {
            ticks: Rc::clone(ticks),
        })
    }

    fn run_frame(loops: &mut LoopRegistry, surfaces: &mut SurfaceRegistry) -> usize {
        let state = SharedState::new();
        let history = History::new();
        let epoch = Instant::now();
        let ctx = FrameContext {
            time: FrameTime::new(epoch, epoch + Duration::from_millis(16)),
            state: &state,
            history: &history,
        };
        loops.frame(surfaces, &ctx)
    }

    #[test]
    fn test_frame_time_elapsed() {
        let epoch = Instant::now();
        let time = FrameTime::new(epoch, epoch + Duration::from_millis(1500));
        assert_eq!(time.elapsed_secs(), 1.5);
    }

    #[test]
    fn test_loop_clears_surface_each_frame() {
        let ticks = Rc::new(Cell::new(0));
        let mut loops = LoopRegistry::new();
        let mut surfaces = SurfaceRegistry::new();
        surfaces.sync([("radar", 40.0, 40.0)]);

        loops.ensure("radar", || Some(scene(&ticks)));
        run_frame(&mut loops, &mut surfaces);
        run_frame(&mut loops, &mut surfaces);

        assert_eq!(ticks.get(), 2);
        assert_eq!(surfaces.get("radar").unwrap().shapes().len(), 1);
        assert_eq!(loops.get("radar").unwrap().frames(), 2);
    }

    #[test]
    fn test_ensure_reuses_existing_loop() {
        let ticks = Rc::new(Cell::new(0));
        let mut loops = LoopRegistry::new();

        assert!(loops.ensure("radar", || Some(scene(&ticks))));
        assert!(!loops.ensure("radar", || panic!("factory must not run twice")));
        assert_eq!(loops.len(), 1);
    }

    #[test]
    fn test_stopped_loop_does_not_tick() {
        let ticks = Rc::new(Cell::new(0));
        let mut loops = LoopRegistry::new();
        let mut surfaces = SurfaceRegistry::new();
        surfaces.sync([("radar", 40.0, 40.0)]);

        loops.ensure("radar", || Some(scene(&ticks)));
        loops.stop("radar");
        assert_eq!(run_frame(&mut loops, &mut surfaces), 0);
        assert_eq!(ticks.get(), 0);
        assert_eq!(loops.get("radar").map(AnimationLoop::state), Some(LoopState::Idle));

        // ensure() restarts the idle loop without a new scene.
        loops.ensure("radar", || panic!("loop already exists"));
        assert_eq!(run_frame(&mut loops, &mut surfaces), 1);
    }

    #[test]
    fn test_missing_surface_is_skipped() {
        let ticks = Rc::new(Cell::new(0));
        let mut loops = LoopRegistry::new();
        let mut surfaces = SurfaceRegistry::new();

        loops.ensure("network-map", || Some(scene(&ticks)));
        assert_eq!(run_frame(&mut loops, &mut surfaces), 0);
        assert_eq!(ticks.get(), 0);
        assert!(loops.is_running("network-map"));
    }

    #[test]
    fn test_start_replaces_existing_loop() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut loops = LoopRegistry::new();
        let mut surfaces = SurfaceRegistry::new();
        surfaces.sync([("detail-chart", 40.0, 40.0)]);

        loops.start("detail-chart", scene(&first));
        loops.start("detail-chart", scene(&second));
        run_frame(&mut loops, &mut surfaces);

        assert_eq!(loops.len(), 1);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }
}
