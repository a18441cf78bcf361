//! Needle value transitions
//!
//! A transition runs a fixed number of eased steps on a repeating timer. The
//! timer itself lives behind [`TickSource`] so hosts can drive it from a
//! wall clock, an event loop, or synchronously in tests.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;
use std::time::{Duration, Instant};

use crate::error::GaugeError;

/// Number of ticks in one transition
pub const ANIMATION_STEPS: usize = 10;

/// Cosine ease-in-out: 0 at `progress == 0`, 1 at `progress == 1`, monotonic between
pub fn ease_in_out(progress: f64) -> f64 {
    0.5 * (((progress - 0.5) * PI).sin() + 1.0)
}

// ============================================================================
// TICK SOURCES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// A source of repeating, cancellable ticks
pub trait TickSource {
    fn start_repeating(&mut self, interval: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Tick source without a clock; the caller decides when a tick happens.
#[derive(Debug, Default)]
pub struct ManualTicks {
    next_id: u64,
    active: BTreeMap<TimerHandle, Duration>,
    cancelled: BTreeSet<TimerHandle>,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.active.contains_key(&handle)
    }

    pub fn was_cancelled(&self, handle: TimerHandle) -> bool {
        self.cancelled.contains(&handle)
    }

    pub fn interval(&self, handle: TimerHandle) -> Option<Duration> {
        self.active.get(&handle).copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl TickSource for ManualTicks {
    fn start_repeating(&mut self, interval: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.active.insert(handle, interval);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.active.remove(&handle).is_some() {
            self.cancelled.insert(handle);
        }
    }
}

#[derive(Debug)]
struct IntervalTimer {
    interval: Duration,
    next_due: Instant,
}

/// Wall-clock tick source polled by an event loop
#[derive(Debug, Default)]
pub struct IntervalTicks {
    next_id: u64,
    timers: BTreeMap<TimerHandle, IntervalTimer>,
}

impl IntervalTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every timer that is due, at most once per timer.
    ///
    /// A timer that fell behind (a stalled event loop) fires once and is
    /// rescheduled from `now`, so a transition never plays out in one frame.
    pub fn due(&mut self, now: Instant) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for (handle, timer) in self.timers.iter_mut() {
            if timer.next_due > now {
                continue;
            }
            fired.push(*handle);
            timer.next_due += timer.interval;
            if timer.next_due <= now {
                timer.next_due = now + timer.interval;
            }
        }
        fired
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }
}

impl TickSource for IntervalTicks {
    fn start_repeating(&mut self, interval: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let interval = interval.max(Duration::from_millis(1));
        self.timers.insert(
            handle,
            IntervalTimer {
                interval,
                next_due: Instant::now() + interval,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }
}

// ============================================================================
// NEEDLE STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    handle: TimerHandle,
    start: f64,
    end: f64,
    step: usize,
}

/// What a value request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueChange {
    /// The displayed value jumped straight to the target
    Immediate,
    Animating(TimerHandle),
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale or unknown handle; nothing changed
    Ignored,
    /// An intermediate frame; only the needle rotation needs refreshing
    Frame,
    /// The transition reached its end value and the timer was cancelled
    Finished,
}

impl TickOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, TickOutcome::Ignored)
    }
}

/// Displayed and requested needle value plus the in-flight transition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeedleState {
    internal_value: f64,
    target_value: f64,
    received_value: bool,
    transition: Option<Transition>,
}

impl NeedleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value the needle currently shows
    pub fn value(&self) -> f64 {
        self.internal_value
    }

    /// The last accepted requested value
    pub fn target(&self) -> f64 {
        self.target_value
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.transition.map(|t| t.handle)
    }

    /// Requests a new value.
    ///
    /// Non-finite values are rejected and leave the state untouched. Any
    /// running transition is cancelled first; the new one starts from the
    /// value currently displayed.
    pub fn request<T: TickSource + ?Sized>(
        &mut self,
        value: f64,
        duration_ms: f64,
        ticks: &mut T,
    ) -> Result<ValueChange, GaugeError> {
        if !value.is_finite() {
            return Err(GaugeError::NonFiniteValue(value));
        }

        self.cancel(ticks);
        self.target_value = value;

        let first = !self.received_value;
        self.received_value = true;
        if first || !(duration_ms.is_finite() && duration_ms > 0.0) {
            self.internal_value = value;
            return Ok(ValueChange::Immediate);
        }

        let interval =
            Duration::from_micros((duration_ms * 1000.0 / ANIMATION_STEPS as f64).round() as u64);
        let handle = ticks.start_repeating(interval);
        self.transition = Some(Transition {
            handle,
            start: self.internal_value,
            end: value,
            step: 0,
        });
        tracing::trace!(start = self.internal_value, end = value, "needle transition started");
        Ok(ValueChange::Animating(handle))
    }

    /// Advances the transition owning `handle` by one step.
    pub fn on_tick<T: TickSource + ?Sized>(
        &mut self,
        handle: TimerHandle,
        ticks: &mut T,
    ) -> TickOutcome {
        let Some(transition) = self.transition.as_mut() else {
            return TickOutcome::Ignored;
        };
        if transition.handle != handle {
            return TickOutcome::Ignored;
        }

        let progress = transition.step as f64 / (ANIMATION_STEPS - 1) as f64;
        let factor = ease_in_out(progress);
        self.internal_value = transition.start + (transition.end - transition.start) * factor;
        transition.step += 1;

        if transition.step < ANIMATION_STEPS {
            return TickOutcome::Frame;
        }

        // Land exactly on the target, without float residue
        self.internal_value = transition.end;
        self.transition = None;
        ticks.cancel(handle);
        tracing::trace!(value = self.internal_value, "needle transition finished");
        TickOutcome::Finished
    }

    /// Stops a running transition where it is.
    pub fn cancel<T: TickSource + ?Sized>(&mut self, ticks: &mut T) {
        if let Some(transition) = self.transition.take() {
            ticks.cancel(transition.handle);
        }
    }
}
