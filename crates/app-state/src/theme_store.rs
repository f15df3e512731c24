//! Theme store
//!
//! Single source of truth for the page [`AppearanceMode`]. The store
//! resolves the initial mode from the saved preference (falling back to the
//! host's ambient preference), persists every explicit change, pushes the
//! mode to an [`AppearanceSink`] so host presentation hints follow it, and
//! notifies subscribers through a `watch` channel.
//!
//! # Example
//!
//! ```
//! use app_platform::AmbientSignal;
//! use app_state::theme_store::{NoopAppearance, ThemeStore};
//! use storage::{AppearanceMode, MemoryStorage, ThemePreference};
//! use std::sync::Arc;
//!
//! let preference = ThemePreference::new(Arc::new(MemoryStorage::new()));
//! let store = ThemeStore::new(preference.clone(), AmbientSignal::new(true), Arc::new(NoopAppearance));
//!
//! assert_eq!(store.current_mode(), AppearanceMode::Dark);
//! store.toggle();
//! assert_eq!(preference.load(), Some(AppearanceMode::Light));
//! ```

use app_platform::AmbientSignal;
use parking_lot::Mutex;
use std::sync::Arc;
use storage::{AppearanceMode, ThemePreference};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Receives every mode the store settles on
///
/// Implementations synchronise host presentation hints with the mode. They
/// must not call back into the store.
#[cfg_attr(test, mockall::automock)]
pub trait AppearanceSink: Send + Sync {
    /// Bring host presentation in line with `mode`
    fn apply(&self, mode: AppearanceMode);
}

/// Sink that ignores every mode
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAppearance;

impl AppearanceSink for NoopAppearance {
    fn apply(&self, _mode: AppearanceMode) {}
}

/// Pick the starting mode: saved preference, then ambient preference, then light
pub fn resolve_initial_mode(saved: Option<AppearanceMode>, prefers_dark: Option<bool>) -> AppearanceMode {
    saved
        .or_else(|| prefers_dark.map(AppearanceMode::from_prefers_dark))
        .unwrap_or_default()
}

#[derive(Debug)]
struct StoreState {
    mode: AppearanceMode,
    /// Set once the user picks a mode in this session
    explicit: bool,
}

/// Page-wide appearance store
pub struct ThemeStore {
    state: Mutex<StoreState>,
    preference: ThemePreference,
    ambient: AmbientSignal,
    sink: Arc<dyn AppearanceSink>,
    mode_tx: watch::Sender<AppearanceMode>,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    /// Create the store and apply the initial mode to the sink
    pub fn new(
        preference: ThemePreference,
        ambient: AmbientSignal,
        sink: Arc<dyn AppearanceSink>,
    ) -> Self {
        let saved = preference.load();
        let mode = resolve_initial_mode(saved, ambient.current());
        tracing::debug!(%mode, saved = saved.is_some(), "Theme store initialised");

        sink.apply(mode);
        let (mode_tx, _) = watch::channel(mode);

        Self {
            state: Mutex::new(StoreState { mode, explicit: false }),
            preference,
            ambient,
            sink,
            mode_tx,
        }
    }

    /// Current mode
    pub fn current_mode(&self) -> AppearanceMode {
        self.state.lock().mode
    }

    /// Current mode, for subscribers re-reading after a change notification
    pub fn snapshot(&self) -> AppearanceMode {
        self.current_mode()
    }

    /// Whether the user has picked a mode in this session
    pub fn has_explicit_choice(&self) -> bool {
        self.state.lock().explicit
    }

    /// Flip between light and dark, returning the new mode
    ///
    /// The new mode is persisted before the sink sees it. Concurrent calls are
    /// serialised, so the saved value always matches the last completed toggle.
    pub fn toggle(&self) -> AppearanceMode {
        let mut state = self.state.lock();
        let next = state.mode.toggled();
        self.commit(&mut state, next);
        next
    }

    /// Explicitly choose a mode
    pub fn set_mode(&self, mode: AppearanceMode) {
        let mut state = self.state.lock();
        self.commit(&mut state, mode);
    }

    fn commit(&self, state: &mut StoreState, mode: AppearanceMode) {
        let changed = state.mode != mode;
        state.mode = mode;
        state.explicit = true;

        // Persistence failures leave the in-memory mode in place
        self.preference.save(mode);

        if changed {
            tracing::info!(%mode, "Appearance mode changed");
            self.sink.apply(mode);
            self.mode_tx.send_replace(mode);
        }
    }

    /// React to a host ambient preference change, returning whether it was adopted
    ///
    /// Ambient changes only apply while the user has never chosen a mode:
    /// nothing saved and no explicit choice this session.
    pub fn handle_ambient_change(&self, prefers_dark: bool) -> bool {
        let mut state = self.state.lock();
        if state.explicit || self.preference.is_saved() {
            tracing::debug!(prefers_dark, "Ambient change ignored, user preference wins");
            return false;
        }

        let mode = AppearanceMode::from_prefers_dark(prefers_dark);
        if state.mode == mode {
            return false;
        }

        state.mode = mode;
        tracing::info!(%mode, "Adopted ambient appearance mode");
        self.sink.apply(mode);
        self.mode_tx.send_replace(mode);
        true
    }

    /// Subscribe to mode changes
    pub fn subscribe(&self) -> watch::Receiver<AppearanceMode> {
        self.mode_tx.subscribe()
    }

    /// Follow the host ambient signal until the returned handle is dropped
    ///
    /// Returns `None` when the host exposes no ambient signal.
    pub fn watch_ambient(self: &Arc<Self>) -> Option<AmbientWatchHandle> {
        let mut rx = self.ambient.subscribe()?;
        let store = Arc::clone(self);

        let task = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let prefers_dark = *rx.borrow_and_update();
                store.handle_ambient_change(prefers_dark);
            }
        });

        Some(AmbientWatchHandle { task })
    }
}

/// Handle for the ambient preference listener
///
/// When dropped, the listener stops.
#[derive(Debug)]
pub struct AmbientWatchHandle {
    task: JoinHandle<()>,
}

impl AmbientWatchHandle {
    /// Stop listening
    pub fn stop(self) {}
}

impl Drop for AmbientWatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
