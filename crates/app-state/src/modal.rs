//! Modal lifecycle
//!
//! A modal moves linearly through `Closed → Opening → Open → Closing → Closed`.
//! Opening and closing are animation-only phases driven by a
//! [`StageScheduler`] timeline; the controller holds the page
//! [`ScrollLock`] while the modal is opening or open.
//!
//! # Transitions
//!
//! - `open(payload)` from `Closed` starts opening. From `Opening`/`Open` with a
//!   different payload the content is swapped in place and its stagger
//!   replays; the same payload is a no-op. From `Closing` it is rejected.
//! - `close()` from `Opening`/`Open` starts closing and releases the scroll
//!   lock; the payload is cleared when the exit delay elapses. From
//!   `Closing`/`Closed` it is a no-op.
//! - `unmount()` (also run on drop) cancels pending timers, releases the
//!   scroll lock and resets to `Closed` immediately.
//!
//! Every timer callback carries the epoch it was scheduled in and is ignored
//! once a later transition has bumped the epoch.

use crate::scheduler::{StageHandle, StageScheduler, Timeline};
use app_platform::{ScrollGuard, ScrollLock};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Modal errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    /// The modal is playing its exit animation
    #[error("Modal {0} is closing")]
    Closing(&'static str),
}

/// Result type for modal operations
pub type Result<T> = std::result::Result<T, ModalError>;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalPhase {
    /// Not shown
    #[default]
    Closed,
    /// Entry animation running
    Opening,
    /// Fully shown
    Open,
    /// Exit animation running
    Closing,
}

impl ModalPhase {
    /// Whether the modal is on its way in or fully shown
    pub fn is_active(self) -> bool {
        matches!(self, ModalPhase::Opening | ModalPhase::Open)
    }
}

/// Why a modal was dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DismissReason {
    /// Escape key
    Escape,
    /// Click on the backdrop outside the panel
    Backdrop,
    /// Explicit close button
    CloseButton,
}

/// Modal timing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalConfig {
    /// Delay before an opening modal counts as open
    pub settle_delay: Duration,
    /// Content stagger offsets, measured from the moment the modal is open
    pub content_stages: Vec<Duration>,
    /// Exit animation length before the modal is fully closed
    pub exit_delay: Duration,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self::bio()
    }
}

impl ModalConfig {
    /// Bio modal: three content stages
    pub fn bio() -> Self {
        Self {
            settle_delay: Duration::from_millis(50),
            content_stages: [200, 350, 500].into_iter().map(Duration::from_millis).collect(),
            exit_delay: Duration::from_millis(400),
        }
    }

    /// Project modal: five content stages
    pub fn project() -> Self {
        Self {
            content_stages: [200, 350, 500, 650, 800]
                .into_iter()
                .map(Duration::from_millis)
                .collect(),
            ..Self::bio()
        }
    }

    /// Set the settle delay
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the content stagger offsets
    pub fn content_stages(mut self, stages: Vec<Duration>) -> Self {
        self.content_stages = stages;
        self
    }

    /// Set the exit delay
    pub fn exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = delay;
        self
    }

    /// Number of content stages
    pub fn stage_count(&self) -> u32 {
        self.content_stages.len() as u32
    }

    /// Stage 0 marks "open"; stages 1..=N reveal content
    fn opening_timeline(&self) -> Timeline {
        let settle = Timeline::single(self.settle_delay, 0);
        settle
            .clone()
            .then(Timeline::staggered(self.settle_delay, &self.content_stages, 1))
            .unwrap_or(settle)
    }

    fn content_timeline(&self) -> Timeline {
        Timeline::staggered(Duration::ZERO, &self.content_stages, 1)
    }
}

/// Observable modal state
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSnapshot<T> {
    /// Lifecycle phase
    pub phase: ModalPhase,
    /// What the modal shows
    pub payload: Option<T>,
    /// Highest content stage revealed so far (0 = none)
    pub content_stage: u32,
    /// Whether this modal holds the page scroll lock
    pub scroll_locked: bool,
}

impl<T> Default for ModalSnapshot<T> {
    fn default() -> Self {
        Self { phase: ModalPhase::Closed, payload: None, content_stage: 0, scroll_locked: false }
    }
}

struct ModalInner<T> {
    phase: ModalPhase,
    payload: Option<T>,
    content_stage: u32,
    epoch: u64,
    timer: Option<StageHandle>,
    scroll: Option<ScrollGuard>,
}

impl<T: Clone> ModalInner<T> {
    fn snapshot(&self) -> ModalSnapshot<T> {
        ModalSnapshot {
            phase: self.phase,
            payload: self.payload.clone(),
            content_stage: self.content_stage,
            scroll_locked: self.scroll.is_some(),
        }
    }
}

/// Released resources, dropped after the state lock is let go
type Released = (Option<StageHandle>, Option<ScrollGuard>);

/// Lifecycle controller for one modal
pub struct ModalController<T> {
    name: &'static str,
    config: ModalConfig,
    scroll_lock: ScrollLock,
    inner: Arc<Mutex<ModalInner<T>>>,
    tx: Arc<watch::Sender<ModalSnapshot<T>>>,
}

impl<T> std::fmt::Debug for ModalController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalController")
            .field("name", &self.name)
            .field("phase", &self.inner.lock().phase)
            .finish_non_exhaustive()
    }
}

impl<T> ModalController<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a closed modal sharing the page scroll lock
    pub fn new(name: &'static str, config: ModalConfig, scroll_lock: ScrollLock) -> Self {
        let (tx, _) = watch::channel(ModalSnapshot::default());
        Self {
            name,
            config,
            scroll_lock,
            inner: Arc::new(Mutex::new(ModalInner {
                phase: ModalPhase::Closed,
                payload: None,
                content_stage: 0,
                epoch: 0,
                timer: None,
                scroll: None,
            })),
            tx: Arc::new(tx),
        }
    }

    /// Modal name used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Timing configuration
    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    /// Open the modal on `payload`
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(&self, payload: T) -> Result<()> {
        let released: Released;
        {
            let mut inner = self.inner.lock();
            match inner.phase {
                ModalPhase::Closing => return Err(ModalError::Closing(self.name)),
                ModalPhase::Opening | ModalPhase::Open => {
                    if inner.payload.as_ref() == Some(&payload) {
                        return Ok(());
                    }
                    tracing::debug!(modal = self.name, "Swapping modal content in place");
                    inner.payload = Some(payload);
                    inner.content_stage = 0;
                    let timeline = if inner.phase == ModalPhase::Open {
                        self.config.content_timeline()
                    } else {
                        self.config.opening_timeline()
                    };
                    released = (self.schedule(&mut inner, timeline), None);
                }
                ModalPhase::Closed => {
                    tracing::debug!(modal = self.name, "Opening modal");
                    inner.phase = ModalPhase::Opening;
                    inner.payload = Some(payload);
                    inner.content_stage = 0;
                    inner.scroll = Some(self.scroll_lock.acquire());
                    let timeline = self.config.opening_timeline();
                    released = (self.schedule(&mut inner, timeline), None);
                }
            }
            self.tx.send_replace(inner.snapshot());
        }
        drop(released);
        Ok(())
    }

    /// Start closing, returning whether a close began
    ///
    /// Must be called from within a tokio runtime.
    pub fn close(&self) -> bool {
        let released: Released;
        {
            let mut inner = self.inner.lock();
            if !inner.phase.is_active() {
                return false;
            }
            tracing::debug!(modal = self.name, "Closing modal");
            inner.phase = ModalPhase::Closing;
            inner.content_stage = 0;
            let scroll = inner.scroll.take();
            let timeline = Timeline::single(self.config.exit_delay, 0);
            released = (self.schedule(&mut inner, timeline), scroll);
            self.tx.send_replace(inner.snapshot());
        }
        drop(released);
        true
    }

    /// Dismiss the modal at the user's request
    pub fn dismiss(&self, reason: DismissReason) -> bool {
        let closing = self.close();
        if closing {
            tracing::debug!(modal = self.name, ?reason, "Modal dismissed");
        }
        closing
    }

    /// Handle a key press, returning whether it was consumed
    pub fn handle_key(&self, key: &str) -> bool {
        key == "Escape" && self.dismiss(DismissReason::Escape)
    }

    /// Handle a click inside the overlay; only clicks on the backdrop itself dismiss
    pub fn handle_backdrop_click(&self, on_backdrop: bool) -> bool {
        on_backdrop && self.dismiss(DismissReason::Backdrop)
    }

    /// Tear the modal down immediately
    pub fn unmount(&self) {
        let released: Released;
        {
            let mut inner = self.inner.lock();
            inner.epoch += 1;
            released = (inner.timer.take(), inner.scroll.take());
            inner.phase = ModalPhase::Closed;
            inner.payload = None;
            inner.content_stage = 0;
            self.tx.send_replace(inner.snapshot());
        }
        drop(released);
    }

    /// Current phase
    pub fn phase(&self) -> ModalPhase {
        self.inner.lock().phase
    }

    /// Current payload
    pub fn payload(&self) -> Option<T> {
        self.inner.lock().payload.clone()
    }

    /// Highest content stage revealed so far
    pub fn content_stage(&self) -> u32 {
        self.inner.lock().content_stage
    }

    /// Whether this modal holds the page scroll lock
    pub fn is_scroll_locked(&self) -> bool {
        self.inner.lock().scroll.is_some()
    }

    /// Full observable state
    pub fn snapshot(&self) -> ModalSnapshot<T> {
        self.inner.lock().snapshot()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<ModalSnapshot<T>> {
        self.tx.subscribe()
    }

    /// Replace the pending timeline, returning the old handle for dropping
    fn schedule(&self, inner: &mut ModalInner<T>, timeline: Timeline) -> Option<StageHandle> {
        inner.epoch += 1;
        let epoch = inner.epoch;
        let state = Arc::clone(&self.inner);
        let tx = Arc::clone(&self.tx);
        let name = self.name;

        let handle = StageScheduler::run(timeline, move |stage| {
            let mut inner = state.lock();
            if inner.epoch != epoch {
                return;
            }
            match inner.phase {
                ModalPhase::Opening if stage == 0 => {
                    inner.phase = ModalPhase::Open;
                    tracing::trace!(modal = name, "Modal open");
                }
                ModalPhase::Opening | ModalPhase::Open => {
                    inner.content_stage = inner.content_stage.max(stage);
                }
                ModalPhase::Closing => {
                    inner.phase = ModalPhase::Closed;
                    inner.payload = None;
                    tracing::trace!(modal = name, "Modal closed");
                }
                ModalPhase::Closed => return,
            }
            tx.send_replace(inner.snapshot());
        });

        inner.timer.replace(handle)
    }
}

impl<T> Drop for ModalController<T> {
    fn drop(&mut self) {
        let released: Released;
        {
            let mut inner = self.inner.lock();
            inner.epoch += 1;
            released = (inner.timer.take(), inner.scroll.take());
        }
        drop(released);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn modal(lock: &ScrollLock) -> ModalController<String> {
        ModalController::new("test", ModalConfig::bio(), lock.clone())
    }

    #[test]
    fn test_config_presets() {
        assert_eq!(ModalConfig::bio().stage_count(), 3);
        assert_eq!(ModalConfig::project().stage_count(), 5);
        assert_eq!(ModalConfig::project().exit_delay, ms(400));

        let config = ModalConfig::bio().settle_delay(ms(10)).exit_delay(ms(100));
        assert_eq!(config.settle_delay, ms(10));
        assert_eq!(config.exit_delay, ms(100));
    }

    #[test]
    fn test_opening_timeline() {
        let timeline = ModalConfig::bio().opening_timeline();
        let stages: Vec<(Duration, u32)> =
            timeline.stages().iter().map(|s| (s.at, s.index)).collect();
        assert_eq!(stages, vec![(ms(50), 0), (ms(250), 1), (ms(400), 2), (ms(550), 3)]);
    }

    #[test]
    fn test_opening_timeline_without_content_stages() {
        let config = ModalConfig::bio().content_stages(Vec::new());
        let timeline = config.opening_timeline();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.stages()[0], crate::scheduler::Stage { at: ms(50), index: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_settles_and_reveals_content() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);

        modal.open("bio".to_string()).unwrap();
        assert_eq!(modal.phase(), ModalPhase::Opening);
        assert!(lock.is_locked());

        tokio::time::sleep(ms(60)).await;
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(modal.content_stage(), 0);

        tokio::time::sleep(ms(500)).await;
        assert_eq!(modal.content_stage(), 3);
        assert_eq!(modal.payload(), Some("bio".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_clears_payload_after_exit_delay() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);

        modal.open("bio".to_string()).unwrap();
        tokio::time::sleep(ms(100)).await;

        assert!(modal.close());
        assert_eq!(modal.phase(), ModalPhase::Closing);
        assert!(!lock.is_locked());
        assert_eq!(modal.payload(), Some("bio".to_string()));

        tokio::time::sleep(ms(300)).await;
        assert_eq!(modal.payload(), Some("bio".to_string()));

        tokio::time::sleep(ms(200)).await;
        assert_eq!(modal.phase(), ModalPhase::Closed);
        assert_eq!(modal.payload(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_mid_opening_cancels_settle() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);

        modal.open("bio".to_string()).unwrap();
        assert!(modal.close());

        tokio::time::sleep(ms(100)).await;
        assert_eq!(modal.phase(), ModalPhase::Closing);
        assert_eq!(modal.content_stage(), 0);

        tokio::time::sleep(ms(400)).await;
        assert_eq!(modal.phase(), ModalPhase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_close_is_noop() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);
        assert!(!modal.close());

        modal.open("bio".to_string()).unwrap();
        assert!(modal.close());
        assert!(!modal.close());
        assert_eq!(modal.phase(), ModalPhase::Closing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_while_closing_rejected() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);

        modal.open("bio".to_string()).unwrap();
        modal.close();
        assert_eq!(modal.open("other".to_string()), Err(ModalError::Closing("test")));
        assert!(!lock.is_locked());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_with_new_payload_swaps_in_place() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);

        modal.open("first".to_string()).unwrap();
        tokio::time::sleep(ms(600)).await;
        assert_eq!(modal.content_stage(), 3);

        modal.open("second".to_string()).unwrap();
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(modal.payload(), Some("second".to_string()));
        assert_eq!(modal.content_stage(), 0);
        assert_eq!(lock.holders(), 1);

        tokio::time::sleep(ms(600)).await;
        assert_eq!(modal.content_stage(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_same_payload_is_noop() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);

        modal.open("bio".to_string()).unwrap();
        tokio::time::sleep(ms(600)).await;
        modal.open("bio".to_string()).unwrap();
        assert_eq!(modal.content_stage(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_and_backdrop() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);

        assert!(!modal.handle_key("Escape"));

        modal.open("bio".to_string()).unwrap();
        assert!(!modal.handle_key("Enter"));
        assert!(!modal.handle_backdrop_click(false));
        assert!(modal.handle_key("Escape"));
        assert_eq!(modal.phase(), ModalPhase::Closing);

        tokio::time::sleep(ms(500)).await;
        modal.open("bio".to_string()).unwrap();
        assert!(modal.handle_backdrop_click(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_mid_animation_releases_everything() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);

        modal.open("bio".to_string()).unwrap();
        tokio::time::sleep(ms(10)).await;
        modal.unmount();

        assert!(!lock.is_locked());
        assert_eq!(modal.phase(), ModalPhase::Closed);

        // The pending settle never lands
        tokio::time::sleep(ms(600)).await;
        assert_eq!(modal.phase(), ModalPhase::Closed);
        assert_eq!(modal.content_stage(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_scroll_lock() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);
        modal.open("bio".to_string()).unwrap();
        assert!(lock.is_locked());

        drop(modal);
        assert!(!lock.is_locked());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscription_tracks_phases() {
        let lock = ScrollLock::new();
        let modal = modal(&lock);
        let mut rx = modal.subscribe();

        modal.open("bio".to_string()).unwrap();
        assert_eq!(rx.borrow_and_update().phase, ModalPhase::Opening);

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.phase, ModalPhase::Open);
        assert!(snapshot.scroll_locked);
    }
}
