//! Ambient light/dark preference signal
//!
//! The host reports its system-level "prefers dark" setting once at startup
//! and again whenever the user changes it. Hosts without the API produce an
//! unavailable signal, which consumers treat as "no preference".

use std::sync::Arc;
use tokio::sync::watch;

/// The host's system-level light/dark preference
#[derive(Debug, Clone)]
pub struct AmbientSignal {
    tx: Option<Arc<watch::Sender<bool>>>,
}

impl AmbientSignal {
    /// A signal with the given initial "prefers dark" value
    pub fn new(prefers_dark: bool) -> Self {
        let (tx, _) = watch::channel(prefers_dark);
        Self { tx: Some(Arc::new(tx)) }
    }

    /// A host that exposes no ambient preference
    pub fn unavailable() -> Self {
        Self { tx: None }
    }

    /// Whether the host exposes the signal at all
    pub fn is_available(&self) -> bool {
        self.tx.is_some()
    }

    /// Current "prefers dark" value, if the host has one
    pub fn current(&self) -> Option<bool> {
        self.tx.as_ref().map(|tx| *tx.borrow())
    }

    /// Report a change from the host
    ///
    /// Subscribers are only woken when the value actually changes.
    pub fn set(&self, prefers_dark: bool) {
        if let Some(tx) = &self.tx {
            let changed = tx.send_if_modified(|current| {
                if *current == prefers_dark {
                    false
                } else {
                    *current = prefers_dark;
                    true
                }
            });
            if changed {
                tracing::debug!(prefers_dark, "Ambient preference changed");
            }
        }
    }

    /// Subscribe to changes
    pub fn subscribe(&self) -> Option<watch::Receiver<bool>> {
        self.tx.as_ref().map(|tx| tx.subscribe())
    }
}
