//! User agent classification
//!
//! Only two facts matter to the page: whether it runs on an iOS device
//! (whose browser chrome lags behind theme changes) and whether the browser
//! is Safari itself rather than another engine wrapper.

use serde::{Deserialize, Serialize};

/// Tokens that mark a non-Safari browser on iOS
const NON_SAFARI_TOKENS: [&str; 5] = ["chrome", "crios", "fxios", "edgios", "opios"];

/// Classified host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostPlatform {
    /// iPhone, iPod or iPad (including iPadOS reporting as a Mac)
    pub is_ios: bool,
    /// Safari proper
    pub is_safari: bool,
}

impl HostPlatform {
    /// A desktop host with no known quirks
    pub fn desktop() -> Self {
        Self::default()
    }

    /// Classify a host from its navigator fields
    pub fn detect(user_agent: &str, platform: &str, max_touch_points: u32) -> Self {
        let is_ios = ["iPhone", "iPod", "iPad"].iter().any(|d| user_agent.contains(d))
            || (platform == "MacIntel" && max_touch_points > 1);

        Self { is_ios, is_safari: is_safari(user_agent) }
    }

    /// Whether theme changes need the chrome repaint workaround
    pub fn needs_chrome_repaint_workaround(&self) -> bool {
        self.is_ios
    }

    /// Whether safe-area edges should be masked during theme changes
    pub fn needs_safe_area_overlay(&self) -> bool {
        self.is_ios && self.is_safari
    }
}

/// Safari token present with no other engine token ahead of it
fn is_safari(user_agent: &str) -> bool {
    let ua = user_agent.to_lowercase();
    match ua.find("safari") {
        Some(idx) => !NON_SAFARI_TOKENS.iter().any(|t| ua[..idx].contains(t)),
        None => false,
    }
}
