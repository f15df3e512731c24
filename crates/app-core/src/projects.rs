//! Project catalog
//!
//! The static list of projects shown in the showcase. Records are loaded
//! once from JSON and never change while the page is mounted; the page
//! refers to a selected project by id.

use app_ui::{darken_color, StatusTone};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// JSON could not be parsed
    #[error("Failed to parse project catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two projects share an id
    #[error("Duplicate project id: {0}")]
    DuplicateId(String),

    /// A project has no name
    #[error("Project at position {0} has no name")]
    MissingName(usize),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Shipped and running
    Live,
    /// Public preview
    Beta,
    /// Work in progress
    #[serde(rename = "In Development")]
    InDevelopment,
    /// Finished
    Completed,
}

impl ProjectStatus {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Live => "Live",
            ProjectStatus::Beta => "Beta",
            ProjectStatus::InDevelopment => "In Development",
            ProjectStatus::Completed => "Completed",
        }
    }

    /// Badge colour treatment
    pub fn tone(&self) -> StatusTone {
        match self {
            ProjectStatus::Live => StatusTone::Positive,
            ProjectStatus::Beta => StatusTone::Info,
            ProjectStatus::InDevelopment => StatusTone::Caution,
            ProjectStatus::Completed => StatusTone::Accent,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(ProjectStatus::Live),
            "beta" => Ok(ProjectStatus::Beta),
            "in development" => Ok(ProjectStatus::InDevelopment),
            "completed" => Ok(ProjectStatus::Completed),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

/// Technology used by a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTag {
    /// Display name
    pub name: String,
    /// Icon asset path
    pub icon: String,
    /// Optional brand colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Kind of media item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image
    Image,
    /// Looping video
    Video,
}

/// One screenshot or clip in a project gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Image or video
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Asset path
    pub src: String,
    /// Alternative text
    pub alt: String,
    /// Still frame for videos
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

/// Case study text for a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudy {
    /// The problem
    pub challenge: String,
    /// What was built
    pub solution: String,
    /// The outcome
    pub impact: String,
    /// Headline numbers
    #[serde(default)]
    pub metrics: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// A showcased project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Stable id; derived from the name when omitted
    #[serde(default)]
    pub id: String,
    /// Display name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    /// Project website
    pub url: String,
    /// Icon asset path
    pub icon: String,
    /// Accent colour
    pub color: String,
    /// Technologies used
    #[serde(default)]
    pub tech_stack: Vec<TechTag>,
    /// Gallery items
    #[serde(default)]
    pub media: Vec<MediaItem>,
    /// Case study
    #[serde(default)]
    pub case_study: CaseStudy,
    /// Feature bullets
    #[serde(default)]
    pub features: Vec<String>,
    /// Timeline label
    #[serde(default)]
    pub timeline: String,
    /// Lifecycle status
    pub status: ProjectStatus,
    /// Whether the status badge is shown
    #[serde(default = "default_true")]
    pub show_status: bool,
}

impl Project {
    /// Slug derived from a project name
    pub fn slug(name: &str) -> String {
        let mut slug = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_end_matches('-').to_string()
    }

    /// Darker shade of the accent colour, used behind the project card
    pub fn accent_shade(&self) -> Option<String> {
        darken_color(&self.color, 0.08)
    }

    /// Names of every technology used
    pub fn tech_names(&self) -> impl Iterator<Item = &str> {
        self.tech_stack.iter().map(|t| t.name.as_str())
    }
}

/// Ordered, id-indexed list of projects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
}

impl ProjectCatalog {
    /// Build a catalog, filling in missing ids and rejecting duplicates
    pub fn new(mut projects: Vec<Project>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (position, project) in projects.iter_mut().enumerate() {
            if project.name.trim().is_empty() {
                return Err(CatalogError::MissingName(position));
            }
            if project.id.is_empty() {
                project.id = Project::slug(&project.name);
            }
            if !seen.insert(project.id.clone()) {
                return Err(CatalogError::DuplicateId(project.id.clone()));
            }
        }
        tracing::debug!(count = projects.len(), "Project catalog loaded");
        Ok(Self { projects })
    }

    /// Parse a JSON array of projects
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Project by id
    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Project by name, ignoring case
    pub fn find(&self, name: &str) -> Option<&Project> {
        let name = name.trim();
        self.projects.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Projects in display order
    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    /// Number of projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Distinct technology names across all projects, in first-seen order
    pub fn tech_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.projects
            .iter()
            .flat_map(|p| p.tech_names())
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const CATALOG_JSON: &str = r##"[
        {
            "name": "Simplr",
            "description": "Minimal to-do app",
            "url": "https://example.com/simplr",
            "icon": "/simplr.png",
            "color": "#5227FF",
            "techStack": [
                { "name": "Swift", "icon": "/swift.svg" },
                { "name": "SwiftUI", "icon": "/swiftui.svg", "color": "#0A84FF" }
            ],
            "media": [
                { "type": "image", "src": "/simplr1.jpg", "alt": "Home screen" },
                { "type": "video", "src": "/simplr.mp4", "alt": "Demo", "poster": "/simplr-poster.jpg" },
                { "type": "video", "src": "/simplr2.mp4", "alt": "Widgets" }
            ],
            "caseStudy": {
                "challenge": "Too many features",
                "solution": "Fewer features",
                "impact": "Calm",
                "metrics": ["4.9 rating"]
            },
            "features": ["Widgets"],
            "timeline": "2024",
            "status": "Live"
        },
        {
            "id": "flight",
            "name": "ZeddFlight",
            "description": "Flight tracker",
            "url": "https://example.com/flight",
            "icon": "/flight.png",
            "color": "#1c1917",
            "techStack": [{ "name": "Swift", "icon": "/swift.svg" }],
            "status": "In Development",
            "showStatus": false
        }
    ]"##;
}
