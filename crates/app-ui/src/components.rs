//! UI component view-models for Folio
//!
//! Small pieces of per-component state the page renders from. Each is
//! serializable where it carries plain data so a frontend can render it
//! directly.
//!
//! # Available Components
//!
//! - [`StatusTone`] - Colour treatment for a project status badge
//! - [`Disclosure`] - Open/closed menu that closes on outside clicks
//! - [`HoverTooltip`] - Which item in a row is hovered
//! - [`RevealAfter`] - Skeleton placeholder until a delay elapses

use crate::theme::get_theme;
use app_state::{StageHandle, StageScheduler, Timeline};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storage::AppearanceMode;

// =============================================================================
// Status Badge
// =============================================================================

/// Colour treatment for a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    /// Green
    Positive,
    /// Blue
    Info,
    /// Yellow
    Caution,
    /// Purple
    Accent,
    /// Stone
    #[default]
    Neutral,
}

impl StatusTone {
    /// Colour family name
    pub fn hue(&self) -> &'static str {
        match self {
            StatusTone::Positive => "green",
            StatusTone::Info => "blue",
            StatusTone::Caution => "yellow",
            StatusTone::Accent => "purple",
            StatusTone::Neutral => "stone",
        }
    }

    /// Badge classes for a mode
    pub fn badge_classes(&self, mode: AppearanceMode) -> String {
        let hue = self.hue();
        format!(
            "bg-{hue}-500/20 text-{hue}-600 border-{hue}-500/30 {}",
            get_theme(mode).embossed_class
        )
    }
}

// =============================================================================
// Disclosure
// =============================================================================

/// Open/closed state of a popup menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosure {
    open: bool,
}

impl Disclosure {
    /// A closed menu
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the menu is open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip open/closed from the trigger button
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Close the menu
    pub fn close(&mut self) {
        self.open = false;
    }

    /// A click anywhere on the page; clicks outside the menu close it
    pub fn handle_click(&mut self, inside_menu: bool) {
        if !inside_menu {
            self.open = false;
        }
    }
}

// =============================================================================
// Hover Tooltip
// =============================================================================

/// Hover state for a row of items with tooltips
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverTooltip {
    count: usize,
    hovered: Option<usize>,
}

impl HoverTooltip {
    /// A row of `count` items, none hovered
    pub fn new(count: usize) -> Self {
        Self { count, hovered: None }
    }

    /// Pointer entered item `index`; out-of-range indices are ignored
    pub fn enter(&mut self, index: usize) {
        if index < self.count {
            self.hovered = Some(index);
        }
    }

    /// Pointer left item `index`
    pub fn leave(&mut self, index: usize) {
        if self.hovered == Some(index) {
            self.hovered = None;
        }
    }

    /// Item whose tooltip is showing
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Whether item `index` shows its tooltip
    pub fn is_shown(&self, index: usize) -> bool {
        self.hovered == Some(index)
    }
}

// =============================================================================
// Delayed Reveal
// =============================================================================

/// Placeholder that turns into content after a delay
///
/// Dropping it cancels the pending reveal.
#[derive(Debug)]
pub struct RevealAfter {
    revealed: Arc<AtomicBool>,
    _timer: Option<StageHandle>,
}

impl RevealAfter {
    /// Start the delay; a zero delay reveals immediately
    ///
    /// Must be called from within a tokio runtime when `delay` is non-zero.
    pub fn start(delay: Duration) -> Self {
        if delay.is_zero() {
            return Self::revealed();
        }
        let revealed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&revealed);
        let timer = StageScheduler::run(Timeline::single(delay, 0), move |_| {
            flag.store(true, Ordering::SeqCst);
        });
        Self { revealed, _timer: Some(timer) }
    }

    /// Content shown from the start
    pub fn revealed() -> Self {
        Self { revealed: Arc::new(AtomicBool::new(true)), _timer: None }
    }

    /// Whether the content is shown instead of the skeleton
    pub fn is_revealed(&self) -> bool {
        self.revealed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tone_classes() {
        let classes = StatusTone::Positive.badge_classes(AppearanceMode::Dark);
        assert!(classes.starts_with("bg-green-500/20 text-green-600"));
        assert!(classes.ends_with("embossed-subtle-dark"));

        let classes = StatusTone::Neutral.badge_classes(AppearanceMode::Light);
        assert!(classes.contains("text-stone-600"));
        assert!(classes.ends_with("embossed-subtle-light"));
    }

    #[test]
    fn test_disclosure() {
        let mut menu = Disclosure::new();
        assert!(!menu.is_open());

        menu.toggle();
        assert!(menu.is_open());

        menu.handle_click(true);
        assert!(menu.is_open());

        menu.handle_click(false);
        assert!(!menu.is_open());

        menu.toggle();
        menu.toggle();
        assert!(!menu.is_open());
    }

    #[test]
    fn test_hover_tooltip() {
        let mut row = HoverTooltip::new(3);
        row.enter(1);
        assert!(row.is_shown(1));
        assert!(!row.is_shown(0));

        // Leaving a different item keeps the current tooltip
        row.leave(0);
        assert_eq!(row.hovered(), Some(1));

        row.enter(2);
        row.leave(2);
        assert_eq!(row.hovered(), None);

        row.enter(7);
        assert_eq!(row.hovered(), None);
    }

    #[test]
    fn test_reveal_zero_delay() {
        assert!(RevealAfter::start(Duration::ZERO).is_revealed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_after_delay() {
        let reveal = RevealAfter::start(Duration::from_millis(200));
        assert!(!reveal.is_revealed());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!reveal.is_revealed());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(reveal.is_revealed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_cancelled_on_drop() {
        let reveal = RevealAfter::start(Duration::from_millis(100));
        let flag = Arc::clone(&reveal.revealed);
        drop(reveal);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!flag.load(Ordering::SeqCst));
    }
}
