//! Host environment for Folio
//!
//! This crate models the environment the page runs in: the user agent,
//! the ambient light/dark preference, the document the appearance layer
//! writes to, and the page scroll lock.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ambient;
pub mod document;
pub mod platform;
pub mod scroll;

pub use ambient::AmbientSignal;
pub use document::{Document, HostDocument, MetaTag, StyleTarget};
pub use platform::HostPlatform;
pub use scroll::{ScrollGuard, ScrollLock};
