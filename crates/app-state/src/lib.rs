//! Application state for Folio
//!
//! This crate holds the reactive state behind the page: the theme store,
//! the modal lifecycle controller, and the timer-driven sequencers, all
//! built on a cancellable stage scheduler.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod modal;
pub mod scheduler;
pub mod sequencer;
pub mod theme_store;

pub use modal::{DismissReason, ModalConfig, ModalController, ModalError, ModalPhase, ModalSnapshot};
pub use scheduler::{Stage, StageHandle, StageScheduler, Timeline, TimelineError};
pub use sequencer::{
    FixedStep, LoadingConfig, LoadingHandle, LoadingSequencer, LoadingSnapshot, ProgressStep,
    RandomStep, RotatingDisplay, RotationConfig, RotationHandle, RotationSnapshot,
};
pub use theme_store::{
    resolve_initial_mode, AmbientWatchHandle, AppearanceSink, NoopAppearance, ThemeStore,
};
