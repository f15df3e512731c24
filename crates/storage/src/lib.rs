//! Storage layer for Folio
//!
//! This crate provides client-local key-value persistence and the
//! persisted appearance preference.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;
pub mod preferences;

pub use kv::{KvConfig, KvError, KvStore, MemoryStorage, PreferenceStorage, UnavailableStorage};
pub use preferences::{AppearanceMode, ThemePreference, THEME_PREFERENCE_KEY};
