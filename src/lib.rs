//! Folio: a personal portfolio page
//!
//! Re-exports the workspace crates under one roof and provides tracing
//! initialisation for hosts embedding the page.
//!
//! - [`storage`] - client-local persistence and the saved theme preference
//! - [`app_platform`] - host environment model
//! - [`app_state`] - theme store, modal lifecycle, sequencers
//! - [`app_ui`] - design system and appearance effects
//! - [`app_core`] - portfolio content and the home page

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod logging;

pub use app_core;
pub use app_platform;
pub use app_state;
pub use app_ui;
pub use storage;

pub use logging::init_tracing;
