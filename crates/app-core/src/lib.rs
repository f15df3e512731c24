//! Core application logic for Folio
//!
//! This crate contains the portfolio content (projects, media, links) and
//! the home page that composes the state crates into one screen.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod links;
pub mod media;
pub mod page;
pub mod projects;

pub use links::{mailto, Link, LinkKind, Links};
pub use media::{MediaDisplay, MediaGallery, Thumbnail};
pub use page::{HomePage, PageConfig, PageError, PageSnapshot};
pub use projects::{
    CaseStudy, CatalogError, MediaItem, MediaKind, Project, ProjectCatalog, ProjectStatus, TechTag,
};
