//! Mobile WebKit chrome repaint workaround
//!
//! Mobile WebKit lags behind `theme-color` changes when repainting its
//! toolbars. To force a repaint the chrome hint is flipped to the opposite
//! extreme, then settled on the target colour one frame later; the status
//! bar meta is re-inserted and the viewport meta refreshed on each write.
//! On Safari a pair of safe-area strips in the surface colour are shown
//! briefly after each change to cover the remaining lag.
//!
//! This is host-bug mitigation only. The theme store never sees it; it is
//! switched on per platform by [`HostAppearance::for_platform`].
//!
//! [`HostAppearance::for_platform`]: crate::appearance::HostAppearance::for_platform

use crate::appearance::{replace_meta, PresentationHints, STATUS_BAR_META, THEME_COLOR_META};
use crate::tokens::duration;
use app_platform::HostDocument;
use app_state::{StageHandle, StageScheduler, Timeline};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Chrome colour written before settling on a dark surface
pub const FLIP_TO_DARK: &str = "#ffffff";

/// Chrome colour written before settling on a light surface
pub const FLIP_TO_LIGHT: &str = "#000000";

/// Workaround timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeWorkaroundConfig {
    /// Delay between the flip and the settle write
    pub frame_delay: Duration,
    /// How long the safe-area overlay stays up after a change
    pub overlay_fade: Duration,
    /// Whether to show the safe-area overlay at all
    pub overlay: bool,
}

impl Default for ChromeWorkaroundConfig {
    fn default() -> Self {
        Self {
            frame_delay: duration::ms(duration::FRAME),
            overlay_fade: duration::ms(duration::OVERLAY_FADE),
            overlay: false,
        }
    }
}

impl ChromeWorkaroundConfig {
    /// Set the frame delay
    pub fn frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Set the overlay fade window
    pub fn overlay_fade(mut self, fade: Duration) -> Self {
        self.overlay_fade = fade;
        self
    }

    /// Enable or disable the safe-area overlay
    pub fn overlay(mut self, enabled: bool) -> Self {
        self.overlay = enabled;
        self
    }
}

/// Write the chrome colour and status bar style, leaving one of each
fn write_chrome<D: HostDocument + ?Sized>(doc: &mut D, color: &str, status_bar_style: &str) {
    replace_meta(doc, THEME_COLOR_META, color);
    replace_meta(doc, STATUS_BAR_META, status_bar_style);
    doc.refresh_viewport();
}

/// Flip-then-settle chrome writer
pub struct ChromeRepaintWorkaround<D> {
    document: Arc<Mutex<D>>,
    config: ChromeWorkaroundConfig,
    overlay: Option<SafeAreaOverlay>,
    pending: Mutex<Option<StageHandle>>,
}

impl<D> std::fmt::Debug for ChromeRepaintWorkaround<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeRepaintWorkaround")
            .field("config", &self.config)
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

impl<D: HostDocument + 'static> ChromeRepaintWorkaround<D> {
    /// Create the workaround for a document
    pub fn new(document: Arc<Mutex<D>>, config: ChromeWorkaroundConfig) -> Self {
        let overlay = config.overlay.then(|| SafeAreaOverlay::new(config.overlay_fade));
        Self { document, config, overlay, pending: Mutex::new(None) }
    }

    /// Safe-area overlay, when enabled
    pub fn overlay(&self) -> Option<&SafeAreaOverlay> {
        self.overlay.as_ref()
    }

    /// Whether a settle write is still pending
    pub fn is_settling(&self) -> bool {
        self.pending.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Repaint host chrome for new hints
    ///
    /// Outside a tokio runtime the target colour is written straight away.
    pub fn repaint(&self, hints: &PresentationHints) {
        if tokio::runtime::Handle::try_current().is_err() {
            write_chrome(&mut *self.document.lock(), &hints.chrome_color, &hints.status_bar_style);
            return;
        }

        let flip = if hints.dark_class { FLIP_TO_DARK } else { FLIP_TO_LIGHT };
        write_chrome(&mut *self.document.lock(), flip, &hints.status_bar_style);

        let document = Arc::clone(&self.document);
        let color = hints.chrome_color.clone();
        let status = hints.status_bar_style.clone();
        let settle = StageScheduler::run(Timeline::single(self.config.frame_delay, 0), move |_| {
            write_chrome(&mut *document.lock(), &color, &status);
        });

        // A settle still pending from an earlier change is superseded
        let previous = self.pending.lock().replace(settle);
        drop(previous);

        if let Some(overlay) = &self.overlay {
            overlay.flash();
        }
    }
}

/// Solid strips covering the safe-area edges
#[derive(Debug, Clone)]
pub struct SafeAreaOverlay {
    fade: Duration,
    state: Arc<Mutex<OverlayState>>,
}

#[derive(Debug, Default)]
struct OverlayState {
    visible: bool,
    epoch: u64,
    timer: Option<StageHandle>,
}

impl SafeAreaOverlay {
    /// Create a hidden overlay
    pub fn new(fade: Duration) -> Self {
        Self { fade, state: Arc::new(Mutex::new(OverlayState::default())) }
    }

    /// Whether the strips are showing
    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    /// Show the strips and restart the fade window
    ///
    /// Must be called from within a tokio runtime.
    pub fn flash(&self) {
        let previous = {
            let mut state = self.state.lock();
            state.visible = true;
            state.epoch += 1;
            let epoch = state.epoch;
            let shared = Arc::clone(&self.state);
            let timer = StageScheduler::run(Timeline::single(self.fade, 0), move |_| {
                let mut state = shared.lock();
                if state.epoch == epoch {
                    state.visible = false;
                }
            });
            state.timer.replace(timer)
        };
        drop(previous);
    }
}
