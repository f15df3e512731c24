//! Home page composition
//!
//! [`HomePage`] owns everything on the single visible screen: the loading
//! screen, the hero entrance stagger, the bio and project modals (which
//! share one page scroll lock), the rotating tech tag, and the project
//! selection. The theme store is shared with whoever created it.
//!
//! Every timer the page starts is owned by a handle on the page, so
//! [`HomePage::unmount`] (or dropping the page) cancels all of them and
//! releases the scroll lock.

use crate::links::Links;
use crate::media::{MediaDisplay, MediaGallery, Thumbnail};
use crate::projects::{Project, ProjectCatalog};
use app_platform::ScrollLock;
use app_state::{
    AmbientWatchHandle, LoadingConfig, LoadingHandle, LoadingSequencer, ModalConfig,
    ModalController, ModalError, ModalPhase, ProgressStep, RandomStep, RotatingDisplay,
    RotationConfig, RotationHandle, StageHandle, StageScheduler, ThemeStore, Timeline,
};
use app_ui::duration;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use storage::AppearanceMode;
use thiserror::Error;

/// Page interaction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// No project has this id
    #[error("Unknown project: {0}")]
    UnknownProject(String),

    /// The modal refused the request
    #[error(transparent)]
    Modal(#[from] ModalError),
}

/// Result type for page operations
pub type Result<T> = std::result::Result<T, PageError>;

/// Page timing configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    /// Loading screen
    pub loading: LoadingConfig,
    /// Bio modal
    pub bio: ModalConfig,
    /// Project modal
    pub project: ModalConfig,
    /// Hero entrance stagger, measured from the loading screen lifting
    pub entrance_stages: Vec<Duration>,
    /// Rotating tech tag
    pub rotation: RotationConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            loading: LoadingConfig::default(),
            bio: ModalConfig::bio(),
            project: ModalConfig::project(),
            entrance_stages: duration::all(&duration::ENTRANCE_STAGES),
            rotation: RotationConfig::default(),
        }
    }
}

impl PageConfig {
    /// Set the loading screen config
    pub fn loading(mut self, loading: LoadingConfig) -> Self {
        self.loading = loading;
        self
    }

    /// Set the bio modal config
    pub fn bio(mut self, bio: ModalConfig) -> Self {
        self.bio = bio;
        self
    }

    /// Set the project modal config
    pub fn project(mut self, project: ModalConfig) -> Self {
        self.project = project;
        self
    }

    /// Set the entrance stagger
    pub fn entrance_stages(mut self, stages: Vec<Duration>) -> Self {
        self.entrance_stages = stages;
        self
    }

    /// Set the rotating tag config
    pub fn rotation(mut self, rotation: RotationConfig) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Observable page state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSnapshot {
    /// Whether the loading screen still covers the page
    pub loading_visible: bool,
    /// Loading progress
    pub loading_progress: f64,
    /// Highest hero entrance stage revealed (0 = none)
    pub entrance_stage: u32,
    /// Bio modal phase
    pub bio: ModalPhase,
    /// Project modal phase
    pub project: ModalPhase,
    /// Whether page scrolling is suspended
    pub scroll_locked: bool,
    /// Current appearance
    pub mode: AppearanceMode,
}

#[derive(Debug)]
struct PageState {
    mounted: bool,
    loading_visible: bool,
    entrance_stage: u32,
}

/// The portfolio home page
pub struct HomePage {
    config: PageConfig,
    theme: Arc<ThemeStore>,
    catalog: Arc<ProjectCatalog>,
    links: Links,
    scroll: ScrollLock,
    bio: ModalController<()>,
    project: ModalController<String>,
    gallery: Mutex<Option<(String, MediaGallery)>>,
    state: Arc<Mutex<PageState>>,
    entrance: Arc<Mutex<Option<StageHandle>>>,
    loading: Mutex<Option<LoadingHandle>>,
    rotation: Mutex<Option<RotationHandle<String>>>,
    ambient: Mutex<Option<AmbientWatchHandle>>,
}

impl std::fmt::Debug for HomePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomePage").field("snapshot", &self.snapshot()).finish_non_exhaustive()
    }
}

impl HomePage {
    /// Mount the page with randomised loading progress
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(
        config: PageConfig,
        theme: Arc<ThemeStore>,
        catalog: Arc<ProjectCatalog>,
        links: Links,
    ) -> Self {
        let step = RandomStep::new(config.loading.increment.clone());
        Self::mount_with_step(config, theme, catalog, links, step)
    }

    /// Mount the page with a given progress step
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount_with_step<S: ProgressStep>(
        config: PageConfig,
        theme: Arc<ThemeStore>,
        catalog: Arc<ProjectCatalog>,
        links: Links,
        step: S,
    ) -> Self {
        let scroll = ScrollLock::new();
        let state = Arc::new(Mutex::new(PageState {
            mounted: true,
            loading_visible: true,
            entrance_stage: 0,
        }));
        let entrance = Arc::new(Mutex::new(None));

        let on_loaded = {
            let state = Arc::clone(&state);
            let entrance = Arc::clone(&entrance);
            let stages = config.entrance_stages.clone();
            move || start_entrance(state, entrance, &stages)
        };
        let loading = LoadingSequencer::start(config.loading.clone(), step, on_loaded);
        let rotation = RotatingDisplay::start(catalog.tech_names(), config.rotation);
        let ambient = theme.watch_ambient();

        tracing::info!(projects = catalog.len(), mode = %theme.current_mode(), "Home page mounted");

        Self {
            bio: ModalController::new("bio", config.bio.clone(), scroll.clone()),
            project: ModalController::new("project", config.project.clone(), scroll.clone()),
            config,
            theme,
            catalog,
            links,
            scroll,
            gallery: Mutex::new(None),
            state,
            entrance,
            loading: Mutex::new(Some(loading)),
            rotation: Mutex::new(Some(rotation)),
            ambient: Mutex::new(ambient),
        }
    }

    // =========================================================================
    // Modals
    // =========================================================================

    /// Open the bio modal
    pub fn open_bio(&self) -> Result<()> {
        Ok(self.bio.open(())?)
    }

    /// Close the bio modal
    pub fn close_bio(&self) -> bool {
        self.bio.close()
    }

    /// Open the project modal on `id`
    ///
    /// With the modal already open on another project the content swaps in place.
    pub fn open_project(&self, id: &str) -> Result<()> {
        let project = self
            .catalog
            .get(id)
            .ok_or_else(|| PageError::UnknownProject(id.to_string()))?;

        let was_closed = self.project.phase() == ModalPhase::Closed;
        self.project.open(project.id.clone())?;

        let mut gallery = self.gallery.lock();
        let stale = gallery.as_ref().map_or(true, |(shown, _)| shown != &project.id);
        if was_closed || stale {
            *gallery = Some((project.id.clone(), MediaGallery::for_project(project)));
        }
        Ok(())
    }

    /// Close the project modal
    pub fn close_project(&self) -> bool {
        self.project.close()
    }

    /// Project shown in the project modal, until its exit animation ends
    pub fn selected_project(&self) -> Option<&Project> {
        self.project.payload().and_then(|id| self.catalog.get(&id))
    }

    /// Route a key press to the topmost open modal
    pub fn handle_key(&self, key: &str) -> bool {
        if self.project.phase().is_active() {
            self.project.handle_key(key)
        } else {
            self.bio.handle_key(key)
        }
    }

    /// Bio modal controller
    pub fn bio_modal(&self) -> &ModalController<()> {
        &self.bio
    }

    /// Project modal controller
    pub fn project_modal(&self) -> &ModalController<String> {
        &self.project
    }

    // =========================================================================
    // Media gallery
    // =========================================================================

    /// Select a gallery item in the open project
    pub fn select_media(&self, index: usize) -> bool {
        self.with_gallery(|g| g.select(index)).unwrap_or(false)
    }

    /// Record a gallery video failure in the open project
    pub fn report_video_error(&self, index: usize) {
        self.with_gallery(|g| g.report_video_error(index));
    }

    /// What the gallery's main slot shows
    pub fn current_media(&self) -> MediaDisplay {
        self.with_gallery(|g| g.current()).unwrap_or(MediaDisplay::Empty)
    }

    /// Gallery thumbnails for the open project
    pub fn thumbnails(&self) -> Vec<Thumbnail> {
        self.with_gallery(|g| g.thumbnails()).unwrap_or_default()
    }

    fn with_gallery<R>(&self, f: impl FnOnce(&mut MediaGallery) -> R) -> Option<R> {
        let selected = self.project.payload()?;
        let mut gallery = self.gallery.lock();
        match gallery.as_mut() {
            Some((id, gallery)) if *id == selected => Some(f(gallery)),
            _ => None,
        }
    }

    // =========================================================================
    // Page state
    // =========================================================================

    /// Flip the page appearance
    pub fn toggle_theme(&self) -> AppearanceMode {
        self.theme.toggle()
    }

    /// Current appearance
    pub fn mode(&self) -> AppearanceMode {
        self.theme.current_mode()
    }

    /// Whether the loading screen still covers the page
    pub fn is_loading_visible(&self) -> bool {
        self.state.lock().loading_visible
    }

    /// Highest hero entrance stage revealed
    pub fn entrance_stage(&self) -> u32 {
        self.state.lock().entrance_stage
    }

    /// Whether every hero entrance stage has been revealed
    pub fn is_entrance_complete(&self) -> bool {
        self.entrance_stage() as usize >= self.config.entrance_stages.len()
            && !self.is_loading_visible()
    }

    /// Whether page scrolling is suspended
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll.is_locked()
    }

    /// Tech tag currently shown in the rotating display
    pub fn rotating_tag(&self) -> Option<String> {
        self.rotation.lock().as_ref().and_then(|r| r.current())
    }

    /// Outbound links
    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Project catalog
    pub fn catalog(&self) -> &ProjectCatalog {
        &self.catalog
    }

    /// Theme store
    pub fn theme(&self) -> &Arc<ThemeStore> {
        &self.theme
    }

    /// Full observable state
    pub fn snapshot(&self) -> PageSnapshot {
        let (loading_visible, entrance_stage) = {
            let state = self.state.lock();
            (state.loading_visible, state.entrance_stage)
        };
        PageSnapshot {
            loading_visible,
            loading_progress: self.loading.lock().as_ref().map_or(0.0, |l| l.progress()),
            entrance_stage,
            bio: self.bio.phase(),
            project: self.project.phase(),
            scroll_locked: self.scroll.is_locked(),
            mode: self.theme.current_mode(),
        }
    }

    /// Tear the page down, cancelling every timer and releasing the scroll lock
    pub fn unmount(&self) {
        let was_mounted = std::mem::replace(&mut self.state.lock().mounted, false);

        // Handles are dropped outside the locks; their callbacks take the same locks
        let loading = self.loading.lock().take();
        drop(loading);
        let entrance = self.entrance.lock().take();
        drop(entrance);
        let rotation = self.rotation.lock().take();
        drop(rotation);
        let ambient = self.ambient.lock().take();
        drop(ambient);

        self.bio.unmount();
        self.project.unmount();
        *self.gallery.lock() = None;

        if was_mounted {
            tracing::info!("Home page unmounted");
        }
    }
}

impl Drop for HomePage {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Lift the loading screen and start the hero entrance stagger
fn start_entrance(
    state: Arc<Mutex<PageState>>,
    entrance: Arc<Mutex<Option<StageHandle>>>,
    stages: &[Duration],
) {
    {
        let mut state = state.lock();
        if !state.mounted || !state.loading_visible {
            return;
        }
        state.loading_visible = false;
    }
    tracing::debug!("Loading screen lifted");

    let stage_state = Arc::clone(&state);
    let handle = StageScheduler::run(Timeline::staggered(Duration::ZERO, stages, 1), move |stage| {
        let mut state = stage_state.lock();
        if state.mounted {
            state.entrance_stage = state.entrance_stage.max(stage);
        }
    });
    let previous = entrance.lock().replace(handle);
    drop(previous);
}
