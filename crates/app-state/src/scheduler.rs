//! Cancellable stage scheduler
//!
//! Animation sequences are expressed as a [`Timeline`]: a finite list of
//! `(offset, stage)` pairs measured from the moment the timeline starts.
//! [`StageScheduler::run`] drives one timeline from a single spawned task,
//! so stages fire in strictly increasing order, and cancelling the whole
//! sequence is one call on the returned [`StageHandle`].

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Timeline construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// Stage indices must strictly increase
    #[error("Stage {stage} does not follow stage {previous}")]
    StageOrder {
        /// Index of the preceding stage
        previous: u32,
        /// Offending stage index
        stage: u32,
    },

    /// Offsets must not decrease
    #[error("Stage {stage} is scheduled before the stage preceding it")]
    OffsetOrder {
        /// Offending stage index
        stage: u32,
    },
}

/// Result type for timeline construction
pub type Result<T> = std::result::Result<T, TimelineError>;

/// One scheduled stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// Offset from the start of the timeline
    pub at: Duration,
    /// Stage index
    pub index: u32,
}

/// Validated, ordered sequence of stages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    stages: Vec<Stage>,
}

impl Timeline {
    /// Build a timeline from `(offset, stage)` pairs
    pub fn new(stages: impl IntoIterator<Item = (Duration, u32)>) -> Result<Self> {
        let mut validated: Vec<Stage> = Vec::new();
        for (at, index) in stages {
            if let Some(last) = validated.last() {
                if index <= last.index {
                    return Err(TimelineError::StageOrder { previous: last.index, stage: index });
                }
                if at < last.at {
                    return Err(TimelineError::OffsetOrder { stage: index });
                }
            }
            validated.push(Stage { at, index });
        }
        Ok(Self { stages: validated })
    }

    /// A timeline with one stage
    pub fn single(at: Duration, index: u32) -> Self {
        Self { stages: vec![Stage { at, index }] }
    }

    /// Stages `first, first + 1, ...` at `lead + offset` for each offset
    ///
    /// Offsets are sorted first, so any list of offsets yields a valid timeline.
    pub fn staggered(lead: Duration, offsets: &[Duration], first: u32) -> Self {
        let mut sorted = offsets.to_vec();
        sorted.sort();
        let stages = sorted
            .into_iter()
            .zip(first..)
            .map(|(offset, index)| Stage { at: lead + offset, index })
            .collect();
        Self { stages }
    }

    /// Append another timeline's stages after this one's
    pub fn then(mut self, other: Timeline) -> Result<Self> {
        let pairs = self
            .stages
            .drain(..)
            .chain(other.stages)
            .map(|s| (s.at, s.index))
            .collect::<Vec<_>>();
        Self::new(pairs)
    }

    /// Scheduled stages in firing order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the timeline has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Offset of the final stage
    pub fn duration(&self) -> Duration {
        self.stages.last().map(|s| s.at).unwrap_or_default()
    }
}

/// Gate between a timer task and the code that cancels it
///
/// Callbacks run while holding the gate and only when it is open; once
/// [`CancelGate::close`] returns, no callback is running or will run.
#[derive(Debug, Default)]
pub(crate) struct CancelGate {
    closed: Mutex<bool>,
}

impl CancelGate {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Run `f` unless the gate is closed, returning whether it ran
    pub(crate) fn pass(&self, f: impl FnOnce()) -> bool {
        let closed = self.closed.lock();
        if *closed {
            return false;
        }
        f();
        true
    }

    pub(crate) fn close(&self) {
        *self.closed.lock() = true;
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.closed.lock()
    }
}

/// Drives timelines on the tokio runtime
pub struct StageScheduler;

impl StageScheduler {
    /// Start a timeline, calling `on_stage` with each stage index as it fires
    ///
    /// Must be called from within a tokio runtime.
    pub fn run<F>(timeline: Timeline, mut on_stage: F) -> StageHandle
    where
        F: FnMut(u32) + Send + 'static,
    {
        let gate = CancelGate::new();
        let task_gate = Arc::clone(&gate);
        let start = Instant::now();

        let task = tokio::spawn(async move {
            for stage in timeline.stages {
                tokio::time::sleep_until(start + stage.at).await;
                if !task_gate.pass(|| on_stage(stage.index)) {
                    break;
                }
            }
        });

        StageHandle { gate, task: Some(task) }
    }
}

/// Handle to a running timeline
///
/// When dropped, the timeline is cancelled.
#[derive(Debug)]
pub struct StageHandle {
    gate: Arc<CancelGate>,
    task: Option<JoinHandle<()>>,
}

impl StageHandle {
    /// Cancel the remaining stages
    pub fn cancel(mut self) {
        self.stop();
    }

    /// Whether every stage has fired
    pub fn is_finished(&self) -> bool {
        !self.gate.is_closed() && self.task.as_ref().is_some_and(|t| t.is_finished())
    }

    fn stop(&mut self) {
        self.gate.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for StageHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
