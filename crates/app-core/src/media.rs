//! Project media gallery
//!
//! Selection and load-failure state for the gallery in the project modal.
//! A video that fails to load falls back to its poster, then to the
//! project icon; nothing else about the page is affected.

use crate::projects::{MediaItem, MediaKind, Project};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What the main gallery slot shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaDisplay {
    /// A still image
    Image {
        /// Asset path
        src: String,
        /// Alternative text
        alt: String,
    },
    /// A looping, muted video
    Video {
        /// Asset path
        src: String,
        /// Alternative text
        alt: String,
        /// Still frame shown before playback
        poster: Option<String>,
    },
    /// Nothing to show
    Empty,
}

/// A gallery thumbnail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Image shown in the thumbnail
    pub src: String,
    /// Alternative text
    pub alt: String,
    /// Whether a play badge is drawn over it
    pub is_video: bool,
    /// Whether this is the selected item
    pub selected: bool,
}

/// Gallery state for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaGallery {
    items: Vec<MediaItem>,
    icon: String,
    selected: usize,
    failed: BTreeSet<usize>,
}

impl MediaGallery {
    /// Gallery over a project's media
    pub fn for_project(project: &Project) -> Self {
        Self::new(project.media.clone(), project.icon.clone())
    }

    /// Gallery over `items`, with `icon` as the last-resort fallback
    pub fn new(items: Vec<MediaItem>, icon: String) -> Self {
        Self { items, icon, selected: 0, failed: BTreeSet::new() }
    }

    /// Select item `index`, returning whether it exists
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.selected = index;
        true
    }

    /// Selected index
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Record that the video at `index` failed to load
    pub fn report_video_error(&mut self, index: usize) {
        if self.items.get(index).is_some_and(|item| item.kind == MediaKind::Video) {
            tracing::debug!(index, "Gallery video failed, falling back");
            self.failed.insert(index);
        }
    }

    /// Whether the video at `index` failed
    pub fn has_failed(&self, index: usize) -> bool {
        self.failed.contains(&index)
    }

    /// Back to the first item with no failures recorded
    pub fn reset(&mut self) {
        self.selected = 0;
        self.failed.clear();
    }

    /// What the main slot shows
    pub fn current(&self) -> MediaDisplay {
        let Some(item) = self.items.get(self.selected) else {
            return MediaDisplay::Empty;
        };
        match item.kind {
            MediaKind::Image => MediaDisplay::Image { src: item.src.clone(), alt: item.alt.clone() },
            MediaKind::Video if self.has_failed(self.selected) => MediaDisplay::Image {
                src: self.poster_or_icon(item),
                alt: item.alt.clone(),
            },
            MediaKind::Video => MediaDisplay::Video {
                src: item.src.clone(),
                alt: item.alt.clone(),
                poster: item.poster.clone(),
            },
        }
    }

    /// Thumbnails, shown only when there is more than one item
    pub fn thumbnails(&self) -> Vec<Thumbnail> {
        if self.items.len() < 2 {
            return Vec::new();
        }
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| Thumbnail {
                src: match item.kind {
                    MediaKind::Image => item.src.clone(),
                    MediaKind::Video => self.poster_or_icon(item),
                },
                alt: item.alt.clone(),
                is_video: item.kind == MediaKind::Video,
                selected: index == self.selected,
            })
            .collect()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the gallery has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn poster_or_icon(&self, item: &MediaItem) -> String {
        item.poster.clone().unwrap_or_else(|| self.icon.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::fixtures::CATALOG_JSON;
    use crate::projects::ProjectCatalog;

    fn gallery(id: &str) -> MediaGallery {
        let catalog = ProjectCatalog::from_json(CATALOG_JSON).unwrap();
        MediaGallery::for_project(catalog.get(id).unwrap())
    }

    #[test]
    fn test_starts_on_first_item() {
        let gallery = gallery("simplr");
        assert_eq!(
            gallery.current(),
            MediaDisplay::Image { src: "/simplr1.jpg".to_string(), alt: "Home screen".to_string() }
        );
    }

    #[test]
    fn test_select() {
        let mut gallery = gallery("simplr");
        assert!(gallery.select(1));
        assert!(matches!(gallery.current(), MediaDisplay::Video { ref src, .. } if src == "/simplr.mp4"));

        assert!(!gallery.select(9));
        assert_eq!(gallery.selected(), 1);
    }

    #[test]
    fn test_failed_video_falls_back_to_poster() {
        let mut gallery = gallery("simplr");
        gallery.select(1);
        gallery.report_video_error(1);

        assert_eq!(
            gallery.current(),
            MediaDisplay::Image { src: "/simplr-poster.jpg".to_string(), alt: "Demo".to_string() }
        );
    }

    #[test]
    fn test_failed_video_without_poster_falls_back_to_icon() {
        let mut gallery = gallery("simplr");
        gallery.select(2);
        gallery.report_video_error(2);

        assert_eq!(
            gallery.current(),
            MediaDisplay::Image { src: "/simplr.png".to_string(), alt: "Widgets".to_string() }
        );
    }

    #[test]
    fn test_image_errors_ignored() {
        let mut gallery = gallery("simplr");
        gallery.report_video_error(0);
        gallery.report_video_error(42);
        assert!(!gallery.has_failed(0));
        assert!(!gallery.has_failed(42));
    }

    #[test]
    fn test_reset() {
        let mut gallery = gallery("simplr");
        gallery.select(2);
        gallery.report_video_error(2);
        gallery.reset();

        assert_eq!(gallery.selected(), 0);
        assert!(!gallery.has_failed(2));
    }

    #[test]
    fn test_empty_gallery() {
        let gallery = gallery("flight");
        assert!(gallery.is_empty());
        assert_eq!(gallery.current(), MediaDisplay::Empty);
        assert!(gallery.thumbnails().is_empty());
    }

    #[test]
    fn test_thumbnails() {
        let mut gallery = gallery("simplr");
        gallery.select(1);
        let thumbs = gallery.thumbnails();

        assert_eq!(thumbs.len(), 3);
        assert_eq!(thumbs[0].src, "/simplr1.jpg");
        assert_eq!(thumbs[1].src, "/simplr-poster.jpg");
        assert!(thumbs[1].is_video && thumbs[1].selected);
        assert_eq!(thumbs[2].src, "/simplr.png");
    }
}
