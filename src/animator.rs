//! Smooth numeric transitions for the headline counters.
//!
//! Every display slot moves toward its target in a fixed number of equal
//! steps on a fixed cadence. A new target replaces the running transition
//! and starts from wherever the value currently is.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

/// An in-progress transition.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Interpolation {
    target: f64,
    step_size: f64,
    steps_remaining: u32,
    next_step_at: Instant,
}

/// A displayed value and its transition, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimatedValue {
    displayed: f64,
    interpolation: Option<Interpolation>,
}

impl AnimatedValue {
    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    /// Target of the running transition, or the settled value.
    pub fn target(&self) -> f64 {
        self.interpolation.map_or(self.displayed, |i| i.target)
    }

    pub fn steps_remaining(&self) -> u32 {
        self.interpolation.map_or(0, |i| i.steps_remaining)
    }

    /// Apply one step; the last one lands exactly on the target.
    fn step(&mut self, interval: Duration) {
        let Some(mut running) = self.interpolation else {
            return;
        };
        running.steps_remaining = running.steps_remaining.saturating_sub(1);
        if running.steps_remaining == 0 {
            self.displayed = running.target;
            self.interpolation = None;
        } else {
            self.displayed = (self.displayed + running.step_size).max(0.0);
            running.next_step_at += interval;
            self.interpolation = Some(running);
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Animates one value per slot `K`.
#[derive(Debug, Clone)]
pub struct ValueAnimator<K: Ord> {
    values: BTreeMap<K, AnimatedValue>,
    steps: u32,
    step_interval: Duration,
}

impl<K: Ord + Copy + std::fmt::Debug> ValueAnimator<K> {
    pub fn new(steps: u32, step_interval: Duration) -> Self {
        Self {
            values: BTreeMap::new(),
            steps: steps.max(1),
            step_interval,
        }
    }

    /// Move `slot` toward `target`, starting at `now`.
    ///
    /// Negative or non-finite targets are treated as 0. Retargeting to the
    /// value already being approached leaves the transition untouched.
    pub fn retarget(&mut self, slot: K, target: f64, now: Instant) {
        let target = sanitize(target);
        let value = self.values.entry(slot).or_default();

        if let Some(running) = value.interpolation {
            if running.target == target {
                return;
            }
        }
        if value.displayed == target {
            value.interpolation = None;
            return;
        }

        let step_size = (target - value.displayed) / f64::from(self.steps);
        trace!(?slot, from = value.displayed, to = target, "retarget");
        value.interpolation = Some(Interpolation {
            target,
            step_size,
            steps_remaining: self.steps,
            next_step_at: now + self.step_interval,
        });
    }

    /// Run every step that is due at `now`. Returns `true` if any value moved.
    pub fn advance(&mut self, now: Instant) -> bool {
        let interval = self.step_interval;
        let mut moved = false;
        for value in self.values.values_mut() {
            while value
                .interpolation
                .is_some_and(|running| running.next_step_at <= now)
            {
                value.step(interval);
                moved = true;
            }
        }
        moved
    }

    /// Run exactly one step on every running transition, regardless of time.
    pub fn tick(&mut self) {
        let interval = self.step_interval;
        for value in self.values.values_mut() {
            value.step(interval);
        }
    }

    /// Current unrounded value (0 for unknown slots).
    pub fn displayed(&self, slot: K) -> f64 {
        self.values.get(&slot).map_or(0.0, |v| v.displayed)
    }

    /// Value for display: rounded and never negative.
    pub fn shown(&self, slot: K) -> u64 {
        self.displayed(slot).round().max(0.0) as u64
    }

    pub fn get(&self, slot: K) -> Option<&AnimatedValue> {
        self.values.get(&slot)
    }

    pub fn is_animating(&self, slot: K) -> bool {
        self.values
            .get(&slot)
            .is_some_and(|v| v.interpolation.is_some())
    }

    /// Stop the transition for `slot`, leaving the value where it is.
    pub fn cancel(&mut self, slot: K) {
        if let Some(value) = self.values.get_mut(&slot) {
            value.interpolation = None;
        }
    }

    /// Number of slots with a running transition.
    pub fn active_count(&self) -> usize {
        self.values
            .values()
            .filter(|v| v.interpolation.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(50);

    fn animator() -> ValueAnimator<u8> {
        ValueAnimator::new(20, STEP)
    }

    /// Step through `n` intervals after `start`.
    fn run_steps(a: &mut ValueAnimator<u8>, start: Instant, n: u32) -> Instant {
        let mut now = start;
        for _ in 0..n {
            now += STEP;
            a.advance(now);
        }
        now
    }

    #[test]
    fn test_reaches_exact_target() {
        let mut a = animator();
        let t0 = Instant::now();
        a.retarget(0, 42.0, t0);

        let mut max_seen: f64 = 0.0;
        let mut now = t0;
        for _ in 0..20 {
            now += STEP;
            a.advance(now);
            let v = a.displayed(0);
            assert!(v >= 0.0 && v.is_finite());
            max_seen = max_seen.max(v);
        }
        assert_eq!(a.displayed(0), 42.0);
        assert_eq!(a.shown(0), 42);
        assert!(max_seen <= 42.0);
        assert!(!a.is_animating(0));
    }

    #[test]
    fn test_steps_are_evenly_spaced() {
        let mut a = animator();
        let t0 = Instant::now();
        a.retarget(0, 42.0, t0);

        let now = run_steps(&mut a, t0, 4);
        assert!((a.displayed(0) - 8.4).abs() < 1e-9);
        assert_eq!(a.shown(0), 8);

        run_steps(&mut a, now, 15);
        assert!((a.displayed(0) - 39.9).abs() < 1e-9);
        assert_eq!(a.shown(0), 40);
    }

    #[test]
    fn test_retarget_mid_flight() {
        let mut a = animator();
        let t0 = Instant::now();
        a.retarget(0, 40.0, t0);
        let now = run_steps(&mut a, t0, 20);
        assert_eq!(a.displayed(0), 40.0);

        a.retarget(0, 100.0, now);
        let now = run_steps(&mut a, now, 10);
        let midway = a.displayed(0);
        assert!((midway - 70.0).abs() < 1e-9);

        a.retarget(0, 10.0, now);
        let mut previous = midway;
        let mut now = now;
        for _ in 0..20 {
            now += STEP;
            a.advance(now);
            let v = a.displayed(0);
            // Strictly heading down toward 10.
            assert!(v < previous);
            assert!(v >= 10.0);
            previous = v;
        }
        assert_eq!(a.displayed(0), 10.0);
    }

    #[test]
    fn test_never_negative() {
        let mut a = animator();
        let t0 = Instant::now();
        a.retarget(0, 5.0, t0);
        let now = run_steps(&mut a, t0, 20);

        a.retarget(0, -30.0, now);
        assert_eq!(a.get(0).unwrap().target(), 0.0);
        let mut now = now;
        for _ in 0..20 {
            now += STEP;
            a.advance(now);
            assert!(a.displayed(0) >= 0.0);
        }
        assert_eq!(a.shown(0), 0);
    }

    #[test]
    fn test_non_finite_target() {
        let mut a = animator();
        let t0 = Instant::now();
        a.retarget(0, 8.0, t0);
        let now = run_steps(&mut a, t0, 20);

        a.retarget(0, f64::NAN, now);
        run_steps(&mut a, now, 20);
        assert_eq!(a.displayed(0), 0.0);

        a.retarget(1, f64::INFINITY, now);
        assert!(!a.is_animating(1));
        assert_eq!(a.displayed(1), 0.0);
    }

    #[test]
    fn test_same_target_is_noop() {
        let mut a = animator();
        let t0 = Instant::now();
        a.retarget(0, 0.0, t0);
        assert!(!a.is_animating(0));

        a.retarget(0, 50.0, t0);
        run_steps(&mut a, t0, 5);
        let before = *a.get(0).unwrap();
        a.retarget(0, 50.0, t0 + STEP * 5);
        assert_eq!(*a.get(0).unwrap(), before);
    }

    #[test]
    fn test_advance_catches_up() {
        let mut a = animator();
        let t0 = Instant::now();
        a.retarget(0, 20.0, t0);

        // One slow frame covering every step.
        assert!(a.advance(t0 + STEP * 25));
        assert_eq!(a.displayed(0), 20.0);
        assert!(!a.advance(t0 + STEP * 26));
    }

    #[test]
    fn test_one_interpolation_per_slot() {
        let mut a = animator();
        let t0 = Instant::now();
        a.retarget(0, 10.0, t0);
        a.retarget(0, 30.0, t0);
        a.retarget(1, 5.0, t0);
        assert_eq!(a.active_count(), 2);
        assert_eq!(a.get(0).unwrap().steps_remaining(), 20);

        a.cancel(0);
        assert_eq!(a.active_count(), 1);
        assert_eq!(a.displayed(0), 0.0);
    }

    #[test]
    fn test_tick_runs_single_step() {
        let mut a = animator();
        a.retarget(0, 40.0, Instant::now());
        a.tick();
        assert!((a.displayed(0) - 2.0).abs() < 1e-9);
        assert_eq!(a.get(0).unwrap().steps_remaining(), 19);
    }
}
