//! Decorative sequencers
//!
//! [`LoadingSequencer`] drives the loading screen: the initial fades in,
//! progress climbs toward a threshold on a fixed tick, and the completion
//! callback fires exactly once after a short hold. [`RotatingDisplay`]
//! cycles through a list of items with a hidden gap between each one.
//!
//! Both run on spawned tokio tasks owned by their handles; dropping the
//! handle stops the sequence and no callback fires afterwards.

use crate::scheduler::{CancelGate, StageHandle, StageScheduler, Timeline};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

// ============================================================================
// Loading screen
// ============================================================================

/// Shortest tick the loading sequence runs at
const MIN_TICK: Duration = Duration::from_millis(1);

/// Threshold used when the configured one cannot be reached
const DEFAULT_THRESHOLD: f64 = 100.0;

/// Loading screen timing
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingConfig {
    /// Delay before the initial fades in
    pub reveal_delay: Duration,
    /// Delay before progress starts climbing
    pub start_delay: Duration,
    /// Interval between progress ticks
    pub tick_interval: Duration,
    /// Range the random increment is drawn from
    pub increment: Range<f64>,
    /// Progress value that completes the sequence
    pub threshold: f64,
    /// Hold between reaching the threshold and the completion callback
    pub exit_hold: Duration,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(300),
            start_delay: Duration::from_millis(800),
            tick_interval: Duration::from_millis(60),
            increment: 3.0..15.0,
            threshold: DEFAULT_THRESHOLD,
            exit_hold: Duration::from_millis(800),
        }
    }
}

impl LoadingConfig {
    /// Set the reveal delay
    pub fn reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    /// Set the start delay
    pub fn start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Set the tick interval
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the increment range
    pub fn increment(mut self, range: Range<f64>) -> Self {
        self.increment = range;
        self
    }

    /// Set the progress value that completes the sequence
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the completion hold
    pub fn exit_hold(mut self, hold: Duration) -> Self {
        self.exit_hold = hold;
        self
    }

    /// Tick interval, never zero
    fn tick(&self) -> Duration {
        self.tick_interval.max(MIN_TICK)
    }

    /// Completion threshold, falling back to the default when not finite and positive
    fn completion_threshold(&self) -> f64 {
        if self.threshold.is_finite() && self.threshold > 0.0 {
            self.threshold
        } else {
            DEFAULT_THRESHOLD
        }
    }

    /// Smallest increment applied on a tick
    fn min_increment(&self) -> f64 {
        if self.increment.start.is_finite() && self.increment.start > 0.0 {
            self.increment.start
        } else {
            1.0
        }
    }
}

/// Source of per-tick progress increments
pub trait ProgressStep: Send + 'static {
    /// Increment for the next tick
    fn next_increment(&mut self) -> f64;
}

/// Random increments drawn uniformly from a range
#[derive(Debug)]
pub struct RandomStep {
    rng: StdRng,
    range: Range<f64>,
}

impl RandomStep {
    /// Seeded from the operating system
    pub fn new(range: Range<f64>) -> Self {
        Self { rng: StdRng::from_os_rng(), range }
    }

    /// Deterministic sequence for a given seed
    pub fn seeded(range: Range<f64>, seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), range }
    }
}

impl ProgressStep for RandomStep {
    fn next_increment(&mut self) -> f64 {
        let (start, end) = (self.range.start, self.range.end);
        if self.range.is_empty() || !start.is_finite() || !end.is_finite() {
            return start;
        }
        self.rng.random_range(self.range.clone())
    }
}

/// The same increment on every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep(pub f64);

impl ProgressStep for FixedStep {
    fn next_increment(&mut self) -> f64 {
        self.0
    }
}

/// Observable loading screen state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadingSnapshot {
    /// Whether the initial has faded in
    pub initial_shown: bool,
    /// Current progress, never above the threshold
    pub progress: f64,
    /// Whether the threshold was reached and the exit animation started
    pub complete: bool,
}

/// Loading screen sequencer
pub struct LoadingSequencer;

impl LoadingSequencer {
    /// Start the loading sequence
    ///
    /// `on_complete` runs once, `exit_hold` after the threshold is reached,
    /// unless the handle is dropped first. Must be called from within a
    /// tokio runtime.
    pub fn start<S, F>(config: LoadingConfig, mut step: S, on_complete: F) -> LoadingHandle
    where
        S: ProgressStep,
        F: FnOnce() + Send + 'static,
    {
        let (tx, _) = watch::channel(LoadingSnapshot::default());
        let tx = Arc::new(tx);
        let gate = CancelGate::new();

        let reveal_tx = Arc::clone(&tx);
        let reveal = StageScheduler::run(Timeline::single(config.reveal_delay, 0), move |_| {
            reveal_tx.send_if_modified(|s| !std::mem::replace(&mut s.initial_shown, true));
        });

        let task_tx = Arc::clone(&tx);
        let task_gate = Arc::clone(&gate);
        let task = tokio::spawn(async move {
            let tick = config.tick();
            let threshold = config.completion_threshold();
            let first_tick = Instant::now() + config.start_delay + tick;
            let mut ticks = tokio::time::interval_at(first_tick, tick);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;
                let mut complete = false;
                let ran = task_gate.pass(|| {
                    let mut increment = step.next_increment();
                    if !increment.is_finite() || increment <= 0.0 {
                        increment = config.min_increment();
                    }
                    task_tx.send_modify(|s| {
                        s.progress = (s.progress + increment).min(threshold);
                        if s.progress >= threshold {
                            s.complete = true;
                        }
                        complete = s.complete;
                    });
                });
                if !ran {
                    return;
                }
                if complete {
                    break;
                }
            }

            tracing::debug!("Loading complete");
            tokio::time::sleep(config.exit_hold).await;
            task_gate.pass(on_complete);
        });

        LoadingHandle { gate, tx, task: Some(task), _reveal: reveal }
    }
}

/// Handle to a running loading sequence
///
/// When dropped, the sequence is cancelled.
pub struct LoadingHandle {
    gate: Arc<CancelGate>,
    tx: Arc<watch::Sender<LoadingSnapshot>>,
    task: Option<JoinHandle<()>>,
    _reveal: StageHandle,
}

impl std::fmt::Debug for LoadingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingHandle").field("snapshot", &self.snapshot()).finish_non_exhaustive()
    }
}

impl LoadingHandle {
    /// Current state
    pub fn snapshot(&self) -> LoadingSnapshot {
        *self.tx.borrow()
    }

    /// Current progress
    pub fn progress(&self) -> f64 {
        self.snapshot().progress
    }

    /// Whether the threshold was reached
    pub fn is_complete(&self) -> bool {
        self.snapshot().complete
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<LoadingSnapshot> {
        self.tx.subscribe()
    }

    /// Stop the sequence without firing the completion callback
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.gate.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for LoadingHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// Rotating display
// ============================================================================

/// Rotating display timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationConfig {
    /// How long each item stays visible
    pub display: Duration,
    /// Hidden gap between items
    pub gap: Duration,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self { display: Duration::from_millis(3000), gap: Duration::from_millis(300) }
    }
}

impl RotationConfig {
    /// Set the display interval
    pub fn display(mut self, display: Duration) -> Self {
        self.display = display;
        self
    }

    /// Set the hidden gap
    pub fn gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }
}

/// Observable rotating display state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationSnapshot {
    /// Index of the current item
    pub index: usize,
    /// Whether the current item is shown
    pub visible: bool,
}

/// Cycles through items indefinitely
pub struct RotatingDisplay;

impl RotatingDisplay {
    /// Start rotating through `items`
    ///
    /// An empty list shows nothing; a single item stays visible. Neither
    /// spawns a task. Must be called from within a tokio runtime otherwise.
    pub fn start<T>(items: Vec<T>, config: RotationConfig) -> RotationHandle<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let items: Arc<[T]> = items.into();
        let visible = !items.is_empty();
        let (tx, _) = watch::channel(RotationSnapshot { index: 0, visible });
        let tx = Arc::new(tx);
        let gate = CancelGate::new();

        let task = (items.len() > 1).then(|| {
            let len = items.len();
            let task_tx = Arc::clone(&tx);
            let task_gate = Arc::clone(&gate);
            tokio::spawn(async move {
                let mut next = Instant::now() + config.display;
                loop {
                    tokio::time::sleep_until(next).await;
                    if !task_gate.pass(|| {
                        task_tx.send_modify(|s| s.visible = false);
                    }) {
                        return;
                    }

                    next += config.gap;
                    tokio::time::sleep_until(next).await;
                    if !task_gate.pass(|| {
                        task_tx.send_modify(|s| {
                            s.index = (s.index + 1) % len;
                            s.visible = true;
                        });
                    }) {
                        return;
                    }

                    next += config.display;
                }
            })
        });

        RotationHandle { items, gate, tx, task }
    }
}

/// Handle to a running rotation
///
/// When dropped, the rotation stops.
pub struct RotationHandle<T> {
    items: Arc<[T]>,
    gate: Arc<CancelGate>,
    tx: Arc<watch::Sender<RotationSnapshot>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Clone> RotationHandle<T> {
    /// Current state
    pub fn snapshot(&self) -> RotationSnapshot {
        *self.tx.borrow()
    }

    /// The item currently shown, if any
    pub fn current(&self) -> Option<T> {
        let snapshot = self.snapshot();
        if !snapshot.visible {
            return None;
        }
        self.items.get(snapshot.index).cloned()
    }

    /// Items being rotated
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<RotationSnapshot> {
        self.tx.subscribe()
    }

    /// Stop rotating
    pub fn stop(mut self) {
        self.halt();
    }
}

impl<T> RotationHandle<T> {
    fn halt(&mut self) {
        self.gate.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drop for RotationHandle<T> {
    fn drop(&mut self) {
        self.halt();
    }
}
