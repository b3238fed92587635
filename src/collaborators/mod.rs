//! Collaborator seams for everything the carousel talks to but does not own.
//!
//! The navigator and input router only ever see these traits, so a real UI,
//! an analytics pipeline, or a test double can be swapped in at startup.

pub mod analytics;
pub mod navigation;
pub mod store;
pub mod view;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{NavigationError, PresentationError, StoreError};
use crate::exit::Destination;
use crate::state::ScreenChange;

pub use analytics::{RecordedEvent, RecordingAnalytics, TracingAnalytics};
pub use navigation::LogNavigation;
pub use store::MemoryStore;
pub use view::{Element, ViewModel, ViewSnapshot};

/// Renders carousel state. The carousel never knows how.
#[async_trait]
pub trait Presentation: Send + Sync {
    /// Show `change.to`, letting the previous screen leave.
    fn set_active_screen(&self, change: ScreenChange) -> Result<(), PresentationError>;

    /// Mark exactly one indicator dot as active.
    fn set_indicator(&self, index: usize) -> Result<(), PresentationError>;

    fn set_button_label(&self, label: &str) -> Result<(), PresentationError>;

    fn set_logo_visible(&self, visible: bool) -> Result<(), PresentationError>;

    /// Start the exit transition. Resolving early is allowed; the caller
    /// still waits out `duration` before continuing.
    async fn play_exit_animation(&self, duration: Duration) -> Result<(), PresentationError>;

    /// Undo the exit transition so the carousel can be shown again.
    fn restore_view(&self) -> Result<(), PresentationError> {
        Ok(())
    }
}

/// Analytics sink. Fire-and-forget: never blocks, never fails back.
pub trait Analytics: Send + Sync {
    fn record(&self, event: &str, payload: serde_json::Value);
}

/// The rest of the application, reached once onboarding is left.
#[async_trait]
pub trait AppNavigation: Send + Sync {
    async fn proceed_to(&self, destination: Destination) -> Result<(), NavigationError>;
}

/// Persistence for the single "has seen onboarding" flag.
#[async_trait]
pub trait OnboardingStore: Send + Sync {
    async fn has_seen_onboarding(&self) -> Result<bool, StoreError>;

    async fn mark_seen_onboarding(&self) -> Result<(), StoreError>;
}

/// Collaborators handed to the input router at construction.
#[derive(Clone)]
pub struct OnboardingDeps {
    pub presentation: Arc<dyn Presentation>,
    pub analytics: Arc<dyn Analytics>,
    pub navigation: Arc<dyn AppNavigation>,
    pub store: Arc<dyn OnboardingStore>,
}

impl OnboardingDeps {
    /// Headless deps: an in-memory view, tracing analytics, logged navigation
    /// and an in-memory flag store.
    pub fn headless() -> (Self, Arc<ViewModel>) {
        let view = Arc::new(ViewModel::new());
        let deps = Self {
            presentation: Arc::clone(&view) as Arc<dyn Presentation>,
            analytics: Arc::new(TracingAnalytics::new()),
            navigation: Arc::new(LogNavigation::new()),
            store: Arc::new(MemoryStore::new()),
        };
        (deps, view)
    }
}

impl std::fmt::Debug for OnboardingDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingDeps").finish_non_exhaustive()
    }
}
