//! Appearance effects
//!
//! Keeps host presentation in step with the [`AppearanceMode`]. The work is
//! split in two: [`compute_hints`] is a pure function from mode to the
//! desired [`PresentationHints`], and [`apply_hints`] writes those hints to
//! a [`HostDocument`]. [`HostAppearance`] ties both to the theme store as an
//! [`AppearanceSink`].

use crate::chrome::{ChromeRepaintWorkaround, ChromeWorkaroundConfig};
use crate::theme::surface_color;
use app_platform::{HostDocument, HostPlatform, StyleTarget};
use app_state::AppearanceSink;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::AppearanceMode;

/// Root class present iff the page is dark
pub const DARK_CLASS: &str = "dark";

/// Meta element carrying the host chrome colour
pub const THEME_COLOR_META: &str = "theme-color";

/// Meta element carrying the standalone status bar style
pub const STATUS_BAR_META: &str = "apple-mobile-web-app-status-bar-style";

/// Shared variable holding the current surface colour
pub const BACKGROUND_VAR: &str = "--color-background";

/// Everything the host should show for one mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationHints {
    /// Mode the hints were computed for
    pub mode: AppearanceMode,
    /// Whether the root carries [`DARK_CLASS`]
    pub dark_class: bool,
    /// Canonical surface colour
    pub surface_color: String,
    /// Host chrome colour hint
    pub chrome_color: String,
    /// CSS `color-scheme`
    pub color_scheme: String,
    /// Standalone status bar style
    pub status_bar_style: String,
}

/// Compute the presentation hints for a mode
pub fn compute_hints(mode: AppearanceMode) -> PresentationHints {
    let surface = surface_color(mode).to_string();
    PresentationHints {
        mode,
        dark_class: mode.is_dark(),
        chrome_color: surface.clone(),
        surface_color: surface,
        color_scheme: mode.as_str().to_string(),
        status_bar_style: match mode {
            AppearanceMode::Dark => "black-translucent",
            AppearanceMode::Light => "default",
        }
        .to_string(),
    }
}

/// Replace every meta element named `name` with one carrying `content`
pub fn replace_meta<D: HostDocument + ?Sized>(doc: &mut D, name: &str, content: &str) {
    let removed = doc.remove_meta(name);
    if removed > 1 {
        tracing::debug!(name, removed, "Removed stale meta duplicates");
    }
    doc.append_meta(name, content);
}

/// Write hints to a document
///
/// Afterwards the document holds exactly one `theme-color` meta.
pub fn apply_hints<D: HostDocument + ?Sized>(doc: &mut D, hints: &PresentationHints) {
    if hints.dark_class {
        doc.add_root_class(DARK_CLASS);
    } else {
        doc.remove_root_class(DARK_CLASS);
    }

    for target in [StyleTarget::Root, StyleTarget::Body, StyleTarget::AppRoot] {
        doc.set_style_property(target, "background-color", &hints.surface_color, true);
    }
    doc.set_style_property(StyleTarget::Root, BACKGROUND_VAR, &hints.surface_color, false);
    doc.set_style_property(StyleTarget::Root, "color-scheme", &hints.color_scheme, false);

    replace_meta(doc, THEME_COLOR_META, &hints.chrome_color);
}

/// Applies presentation hints to a shared document
pub struct HostAppearance<D> {
    document: Arc<Mutex<D>>,
    chrome: Option<ChromeRepaintWorkaround<D>>,
    last: Mutex<Option<PresentationHints>>,
}

impl<D> std::fmt::Debug for HostAppearance<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostAppearance")
            .field("workaround", &self.chrome.is_some())
            .field("last", &*self.last.lock())
            .finish_non_exhaustive()
    }
}

impl<D: HostDocument + 'static> HostAppearance<D> {
    /// Plain adapter without host workarounds
    pub fn new(document: Arc<Mutex<D>>) -> Self {
        Self { document, chrome: None, last: Mutex::new(None) }
    }

    /// Adapter with the chrome repaint workaround the platform needs, if any
    pub fn for_platform(
        document: Arc<Mutex<D>>,
        platform: &HostPlatform,
        config: ChromeWorkaroundConfig,
    ) -> Self {
        let chrome = platform.needs_chrome_repaint_workaround().then(|| {
            let config = config.overlay(platform.needs_safe_area_overlay());
            ChromeRepaintWorkaround::new(Arc::clone(&document), config)
        });
        if chrome.is_some() {
            tracing::debug!(?platform, "Chrome repaint workaround enabled");
        }
        Self { document, chrome, last: Mutex::new(None) }
    }

    /// The document hints are written to
    pub fn document(&self) -> Arc<Mutex<D>> {
        Arc::clone(&self.document)
    }

    /// The repaint workaround, when enabled
    pub fn workaround(&self) -> Option<&ChromeRepaintWorkaround<D>> {
        self.chrome.as_ref()
    }

    /// Hints most recently applied
    pub fn last_hints(&self) -> Option<PresentationHints> {
        self.last.lock().clone()
    }
}

impl<D: HostDocument + 'static> AppearanceSink for HostAppearance<D> {
    fn apply(&self, mode: AppearanceMode) {
        let hints = compute_hints(mode);
        apply_hints(&mut *self.document.lock(), &hints);
        if let Some(chrome) = &self.chrome {
            chrome.repaint(&hints);
        }
        tracing::debug!(%mode, color = %hints.surface_color, "Appearance applied");
        *self.last.lock() = Some(hints);
    }
}
