//! Headless view model: a `Presentation` that keeps what would be on screen
//! in memory.
//!
//! Useful for driving the carousel without a real UI and for inspecting the
//! visible state in tests.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::Presentation;
use crate::error::PresentationError;
use crate::state::ScreenChange;

/// UI elements a view can lack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Screens,
    Indicators,
    PrimaryButton,
    Logo,
}

impl Element {
    fn name(&self) -> &'static str {
        match self {
            Self::Screens => "screens",
            Self::Indicators => "indicators",
            Self::PrimaryButton => "primary_button",
            Self::Logo => "logo",
        }
    }
}

/// What the view currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub active_screen: Option<usize>,
    /// Screen currently sliding out to the left, if any.
    pub exiting_left: Option<usize>,
    pub active_indicator: Option<usize>,
    pub button_label: String,
    pub logo_visible: bool,
    /// True while the exit transition has faded the view out.
    pub faded_out: bool,
    pub exit_animations: u32,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            active_screen: None,
            exiting_left: None,
            active_indicator: None,
            button_label: String::new(),
            logo_visible: true,
            faded_out: false,
            exit_animations: 0,
        }
    }
}

/// In-memory `Presentation`.
#[derive(Debug, Default)]
pub struct ViewModel {
    state: Mutex<ViewSnapshot>,
    missing: HashSet<Element>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view lacking `element`; updates to it fail with `MissingElement`.
    pub fn without(mut self, element: Element) -> Self {
        self.missing.insert(element);
        self
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require(&self, element: Element) -> Result<(), PresentationError> {
        if self.missing.contains(&element) {
            return Err(PresentationError::MissingElement {
                element: element.name().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Presentation for ViewModel {
    fn set_active_screen(&self, change: ScreenChange) -> Result<(), PresentationError> {
        self.require(Element::Screens)?;
        let mut view = self.lock();
        view.active_screen = Some(change.to);
        view.exiting_left = change.exits_left().then_some(change.from);
        Ok(())
    }

    fn set_indicator(&self, index: usize) -> Result<(), PresentationError> {
        self.require(Element::Indicators)?;
        self.lock().active_indicator = Some(index);
        Ok(())
    }

    fn set_button_label(&self, label: &str) -> Result<(), PresentationError> {
        self.require(Element::PrimaryButton)?;
        self.lock().button_label = label.to_string();
        Ok(())
    }

    fn set_logo_visible(&self, visible: bool) -> Result<(), PresentationError> {
        self.require(Element::Logo)?;
        self.lock().logo_visible = visible;
        Ok(())
    }

    async fn play_exit_animation(&self, duration: Duration) -> Result<(), PresentationError> {
        debug!(?duration, "Fading out onboarding view");
        let mut view = self.lock();
        view.faded_out = true;
        view.exit_animations += 1;
        Ok(())
    }

    fn restore_view(&self) -> Result<(), PresentationError> {
        self.lock().faded_out = false;
        Ok(())
    }
}
