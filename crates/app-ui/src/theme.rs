//! Design system themes for Folio
//!
//! The page uses a warm stone palette with one theme per [`AppearanceMode`].
//! Each theme carries the canonical surface colour for its mode; the
//! appearance layer writes that colour to the host chrome hint and the
//! `--color-background` variable.
//!
//! # Usage
//!
//! ```rust
//! use app_ui::theme::{get_theme, surface_color};
//! use storage::AppearanceMode;
//!
//! let theme = get_theme(AppearanceMode::Dark);
//! assert!(theme.is_dark());
//! assert_eq!(theme.colors.background, surface_color(AppearanceMode::Dark));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use storage::AppearanceMode;

// =============================================================================
// Color Types
// =============================================================================

/// A color represented as a hex string (e.g., "#FFFFFF")
pub type Color = String;

/// Parse a hex color string to RGB components
///
/// Accepts 6-digit and 3-digit shorthand forms, with or without `#`.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Convert RGB to hex string
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Darken a hex colour by `fraction` (0.0 keeps it, 1.0 gives black)
///
/// Each channel is scaled by `1 - fraction`, floored and clamped.
pub fn darken_color(hex: &str, fraction: f64) -> Option<String> {
    let (r, g, b) = parse_hex_color(hex)?;
    let factor = (1.0 - fraction).clamp(0.0, 1.0);
    let scale = |c: u8| (c as f64 * factor).floor().clamp(0.0, 255.0) as u8;
    Some(rgb_to_hex(scale(r), scale(g), scale(b)))
}

// =============================================================================
// Stone Palette
// =============================================================================

/// Warm grey scale the page is built on
pub mod stone {
    /// Stone 50, the light surface
    pub const S50: &str = "#fafaf9";
    /// Stone 100
    pub const S100: &str = "#f5f5f4";
    /// Stone 200
    pub const S200: &str = "#e7e5e4";
    /// Stone 300
    pub const S300: &str = "#d6d3d1";
    /// Stone 400
    pub const S400: &str = "#a8a29e";
    /// Stone 500
    pub const S500: &str = "#78716c";
    /// Stone 600
    pub const S600: &str = "#57534e";
    /// Stone 700
    pub const S700: &str = "#44403c";
    /// Stone 800
    pub const S800: &str = "#292524";
    /// Stone 900, the dark surface
    pub const S900: &str = "#1c1917";
    /// Stone 950
    pub const S950: &str = "#0c0a09";
}

/// Canonical light surface colour
pub const SURFACE_LIGHT: &str = stone::S50;

/// Canonical dark surface colour
pub const SURFACE_DARK: &str = stone::S900;

/// Canonical surface colour for a mode
pub fn surface_color(mode: AppearanceMode) -> &'static str {
    match mode {
        AppearanceMode::Light => SURFACE_LIGHT,
        AppearanceMode::Dark => SURFACE_DARK,
    }
}

// =============================================================================
// Theme Definition
// =============================================================================

/// Semantic colours for one theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    /// Page background (the surface colour)
    pub background: Color,
    /// Raised panel background
    pub panel: Color,
    /// Primary text
    pub text: Color,
    /// Secondary text
    pub text_muted: Color,
    /// Hairline borders
    pub border: Color,
    /// Modal backdrop tint
    pub backdrop: Color,
}

/// Complete theme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Mode this theme renders
    pub mode: AppearanceMode,
    /// CSS `color-scheme` value
    pub color_scheme: String,
    /// Semantic colours
    pub colors: ThemeColors,
    /// Class giving panels their embossed edge
    pub embossed_class: String,
}

impl Theme {
    /// Check if this is a dark theme
    pub fn is_dark(&self) -> bool {
        self.mode.is_dark()
    }

    /// The surface colour
    pub fn surface(&self) -> &str {
        &self.colors.background
    }
}

// =============================================================================
// Light Theme
// =============================================================================

/// Create the light theme
pub fn light_theme() -> Theme {
    Theme {
        mode: AppearanceMode::Light,
        color_scheme: "light".to_string(),
        colors: ThemeColors {
            background: SURFACE_LIGHT.to_string(),
            panel: stone::S100.to_string(),
            text: stone::S900.to_string(),
            text_muted: stone::S600.to_string(),
            border: stone::S200.to_string(),
            backdrop: stone::S500.to_string(),
        },
        embossed_class: "embossed-subtle-light".to_string(),
    }
}

// =============================================================================
// Dark Theme
// =============================================================================

/// Create the dark theme
pub fn dark_theme() -> Theme {
    Theme {
        mode: AppearanceMode::Dark,
        color_scheme: "dark".to_string(),
        colors: ThemeColors {
            background: SURFACE_DARK.to_string(),
            panel: stone::S800.to_string(),
            text: stone::S200.to_string(),
            text_muted: stone::S400.to_string(),
            border: stone::S700.to_string(),
            backdrop: stone::S950.to_string(),
        },
        embossed_class: "embossed-subtle-dark".to_string(),
    }
}

// =============================================================================
// Theme Lookup
// =============================================================================

/// Get the theme for a mode
pub fn get_theme(mode: AppearanceMode) -> Theme {
    match mode {
        AppearanceMode::Light => light_theme(),
        AppearanceMode::Dark => dark_theme(),
    }
}

/// Every theme, keyed by mode
pub fn all_themes() -> HashMap<AppearanceMode, Theme> {
    [light_theme(), dark_theme()].into_iter().map(|t| (t.mode, t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Color Utility Tests
    // ==========================================================================

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FFFFFF"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#1c1917"), Some((28, 25, 23)));
        assert_eq!(parse_hex_color("fafaf9"), Some((250, 250, 249)));
        assert_eq!(parse_hex_color("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#0f8"), Some((0, 255, 136)));
        assert_eq!(parse_hex_color("#FF"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#1234567"), None);
        assert_eq!(parse_hex_color("#12345678"), None);
        assert_eq!(parse_hex_color("#+1+2+3"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex(255, 255, 255), "#FFFFFF");
        assert_eq!(rgb_to_hex(28, 25, 23), "#1C1917");
    }

    #[test]
    fn test_darken_color() {
        assert_eq!(darken_color("#5227FF", 0.0).as_deref(), Some("#5227FF"));
        assert_eq!(darken_color("#5227FF", 0.08).as_deref(), Some("#4B23EA"));
        assert_eq!(darken_color("#fff", 0.5).as_deref(), Some("#7F7F7F"));
        assert_eq!(darken_color("#ffffff", 2.0).as_deref(), Some("#000000"));
        assert_eq!(darken_color("#123456", -1.0).as_deref(), Some("#123456"));
        assert_eq!(darken_color("nope", 0.1), None);
    }

    // ==========================================================================
    // Theme Tests
    // ==========================================================================

    #[test]
    fn test_surface_colors() {
        assert_eq!(surface_color(AppearanceMode::Light), "#fafaf9");
        assert_eq!(surface_color(AppearanceMode::Dark), "#1c1917");
    }

    #[test]
    fn test_theme_basics() {
        let light = light_theme();
        assert!(!light.is_dark());
        assert_eq!(light.color_scheme, "light");
        assert_eq!(light.surface(), SURFACE_LIGHT);

        let dark = dark_theme();
        assert!(dark.is_dark());
        assert_eq!(dark.color_scheme, "dark");
        assert_eq!(dark.surface(), SURFACE_DARK);
    }

    #[test]
    fn test_get_theme() {
        assert_eq!(get_theme(AppearanceMode::Light), light_theme());
        assert_eq!(get_theme(AppearanceMode::Dark), dark_theme());
        assert_eq!(all_themes().len(), 2);
    }

    #[test]
    fn test_theme_serialization() {
        let json = serde_json::to_string(&dark_theme()).unwrap();
        assert!(json.contains("\"mode\":\"dark\""));
        let parsed: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dark_theme());
    }

    // ==========================================================================
    // Color Consistency Tests
    // ==========================================================================

    #[test]
    fn test_all_colors_are_valid_hex() {
        for (mode, theme) in all_themes() {
            let c = &theme.colors;
            for color in [&c.background, &c.panel, &c.text, &c.text_muted, &c.border, &c.backdrop] {
                assert!(parse_hex_color(color).is_some(), "Invalid color {} in {:?} theme", color, mode);
            }
        }
    }

    #[test]
    fn test_text_background_contrast() {
        for (mode, theme) in all_themes() {
            let bg = parse_hex_color(&theme.colors.background).unwrap();
            let text = parse_hex_color(&theme.colors.text).unwrap();

            let bg_lum = (bg.0 as u32 + bg.1 as u32 + bg.2 as u32) / 3;
            let text_lum = (text.0 as u32 + text.1 as u32 + text.2 as u32) / 3;

            assert!(
                bg_lum.abs_diff(text_lum) > 100,
                "{:?} theme has insufficient text contrast: bg_lum={}, text_lum={}",
                mode,
                bg_lum,
                text_lum
            );
        }
    }
}
