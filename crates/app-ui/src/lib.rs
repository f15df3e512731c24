//! User interface for Folio
//!
//! This crate provides the design system and the appearance layer the
//! theme store drives.
//!
//! # Design System
//!
//! The page is built on a warm stone palette with one theme per
//! [`storage::AppearanceMode`]:
//! - Light: stone 50 surface (`#fafaf9`)
//! - Dark: stone 900 surface (`#1c1917`)
//!
//! # Modules
//!
//! - [`theme`] - Themes, palette and colour utilities
//! - [`tokens`] - Timing, easing and layering tokens
//! - [`appearance`] - Presentation hints and the host adapter
//! - [`chrome`] - Mobile WebKit chrome repaint workaround
//! - [`components`] - Component view-models
//!
//! # Example
//!
//! ```rust
//! use app_platform::{Document, HostDocument};
//! use app_state::AppearanceSink;
//! use app_ui::appearance::{HostAppearance, THEME_COLOR_META};
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//! use storage::AppearanceMode;
//!
//! let document = Arc::new(Mutex::new(Document::with_theme_color("#ffffff")));
//! let appearance = HostAppearance::new(Arc::clone(&document));
//!
//! appearance.apply(AppearanceMode::Dark);
//! assert_eq!(document.lock().meta_contents(THEME_COLOR_META), vec!["#1c1917"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod appearance;
pub mod chrome;
pub mod components;
pub mod theme;
pub mod tokens;

// Re-export commonly used types
pub use appearance::{
    apply_hints, compute_hints, HostAppearance, PresentationHints, BACKGROUND_VAR, DARK_CLASS,
    STATUS_BAR_META, THEME_COLOR_META,
};

pub use chrome::{ChromeRepaintWorkaround, ChromeWorkaroundConfig, SafeAreaOverlay};

pub use components::{Disclosure, HoverTooltip, RevealAfter, StatusTone};

pub use theme::{
    all_themes, dark_theme, darken_color, get_theme, light_theme, parse_hex_color, rgb_to_hex,
    surface_color, Theme, ThemeColors, SURFACE_DARK, SURFACE_LIGHT,
};

pub use tokens::{duration, easing, z_index};
