//! Design tokens for Folio
//!
//! Timing, easing and layering primitives shared by the page components.
//! Durations are in milliseconds; [`duration::ms`] converts them for the
//! schedulers.

// =============================================================================
// Animation Tokens
// =============================================================================

/// Animation duration tokens (in milliseconds)
pub mod duration {
    use std::time::Duration;

    /// Modal settle delay before content starts staggering in
    pub const MODAL_SETTLE: u64 = 50;
    /// Modal exit animation
    pub const MODAL_EXIT: u64 = 400;
    /// Bio modal content stagger offsets
    pub const BIO_STAGES: [u64; 3] = [200, 350, 500];
    /// Project modal content stagger offsets
    pub const PROJECT_STAGES: [u64; 5] = [200, 350, 500, 650, 800];

    /// Loading screen initial reveal
    pub const LOADING_REVEAL: u64 = 300;
    /// Loading screen progress start
    pub const LOADING_START: u64 = 800;
    /// Loading screen progress tick
    pub const LOADING_TICK: u64 = 60;
    /// Hold between full progress and completion
    pub const LOADING_EXIT_HOLD: u64 = 800;

    /// Hero entrance stagger offsets after the loading screen lifts
    pub const ENTRANCE_STAGES: [u64; 4] = [100, 300, 500, 700];

    /// Safe-area overlay visibility after a mode change
    pub const OVERLAY_FADE: u64 = 700;
    /// Overlay opacity transition
    pub const OVERLAY_TRANSITION: u64 = 220;
    /// One animation frame
    pub const FRAME: u64 = 16;

    /// Prompt card entrance delay
    pub const PROMPT_ENTER: u64 = 100;
    /// Prompt card exit animation
    pub const PROMPT_EXIT: u64 = 300;

    /// Convert a token to a [`Duration`]
    pub const fn ms(token: u64) -> Duration {
        Duration::from_millis(token)
    }

    /// Convert a list of tokens to durations
    pub fn all(tokens: &[u64]) -> Vec<Duration> {
        tokens.iter().copied().map(ms).collect()
    }
}

/// Easing functions
pub mod easing {
    /// Default easing curve
    pub const DEFAULT: &str = "cubic-bezier(0.4, 0, 0.2, 1)";
    /// Linear
    pub const LINEAR: &str = "linear";
    /// Ease out, used for entrances
    pub const EASE_OUT: &str = "cubic-bezier(0, 0, 0.2, 1)";
    /// Overlay fade
    pub const OVERLAY: &str = "ease";
}

// =============================================================================
// Z-Index Tokens
// =============================================================================

/// Z-index layers
pub mod z_index {
    /// Default layer
    pub const DEFAULT: i32 = 0;
    /// Safe-area overlay, kept under interactive UI
    pub const SAFE_AREA_OVERLAY: i32 = 9;
    /// Tooltips and hover previews
    pub const TOOLTIP: i32 = 40;
    /// Modal layer
    pub const MODAL: i32 = 50;
    /// Loading screen, above everything
    pub const LOADING: i32 = 9999;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stagger_offsets_increase() {
        for stages in [&duration::BIO_STAGES[..], &duration::PROJECT_STAGES[..], &duration::ENTRANCE_STAGES[..]] {
            assert!(stages.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_loading_timing() {
        assert!(duration::LOADING_REVEAL < duration::LOADING_START);
        assert!(duration::LOADING_TICK > 0);
    }

    #[test]
    fn test_conversion() {
        assert_eq!(duration::ms(duration::MODAL_EXIT), Duration::from_millis(400));
        assert_eq!(duration::all(&duration::BIO_STAGES).len(), 3);
    }

    #[test]
    fn test_layers() {
        assert!(z_index::SAFE_AREA_OVERLAY < z_index::MODAL);
        assert!(z_index::MODAL < z_index::LOADING);
    }
}
