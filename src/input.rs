//! Raw input signals and the small amount of state needed to interpret them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Default minimum horizontal travel for a touch to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

/// Keys the carousel reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Enter,
    Escape,
    Space,
    /// Anything else, by its DOM key name.
    Other(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowRight" => Self::ArrowRight,
            "ArrowLeft" => Self::ArrowLeft,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            " " | "Spacebar" => Self::Space,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Optional per-screen action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenAction {
    GetStarted,
    LogIn,
}

impl std::fmt::Display for ScreenAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetStarted => write!(f, "get_started"),
            Self::LogIn => write!(f, "log_in"),
        }
    }
}

/// Which screens carry which action buttons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionBindings {
    bindings: BTreeMap<usize, BTreeSet<ScreenAction>>,
}

impl ActionBindings {
    /// No action buttons anywhere.
    pub fn none() -> Self {
        Self::default()
    }

    /// The stock layout: the first screen offers "get started" and "log in",
    /// the last screen offers "finish" (get started) and "log in".
    pub fn standard(total_screens: usize) -> Self {
        let mut bindings = Self::none();
        if total_screens == 0 {
            return bindings;
        }
        for screen in [0, total_screens - 1] {
            bindings = bindings
                .bind(screen, ScreenAction::GetStarted)
                .bind(screen, ScreenAction::LogIn);
        }
        bindings
    }

    pub fn bind(mut self, screen: usize, action: ScreenAction) -> Self {
        self.bindings.entry(screen).or_default().insert(action);
        self
    }

    pub fn is_bound(&self, screen: usize, action: ScreenAction) -> bool {
        self.bindings
            .get(&screen)
            .is_some_and(|actions| actions.contains(&action))
    }

    /// Highest screen index any binding refers to.
    pub fn max_screen(&self) -> Option<usize> {
        self.bindings.keys().next_back().copied()
    }
}

/// A raw input signal.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary ("Next" / "Get Started") button.
    PrimaryClick,
    /// Secondary ("Skip") button.
    SkipClick,
    /// An action button on `screen`.
    Action { screen: usize, action: ScreenAction },
    /// Indicator dot clicked.
    IndicatorClick(usize),
    /// Key pressed while an indicator dot has focus.
    IndicatorKey { index: usize, key: Key },
    /// Key pressed anywhere else.
    Key(Key),
    TouchStart { x: f64 },
    TouchEnd { x: f64 },
}

/// Horizontal swipe direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved right: go back.
    Right,
    /// Finger moved left: go forward.
    Left,
}

/// Start and end of one touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeGesture {
    pub start_x: f64,
    pub end_x: f64,
}

impl SwipeGesture {
    pub fn distance(&self) -> f64 {
        self.end_x - self.start_x
    }

    /// Direction of the swipe, or `None` when it travelled no further than
    /// `threshold`.
    pub fn direction(&self, threshold: f64) -> Option<SwipeDirection> {
        let distance = self.distance();
        if distance.abs() <= threshold {
            return None;
        }
        if distance > 0.0 {
            Some(SwipeDirection::Right)
        } else {
            Some(SwipeDirection::Left)
        }
    }
}

/// Pairs touch-start and touch-end points into gestures.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start_x: Option<f64>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Finish the current touch. `None` if no touch was started.
    pub fn touch_end(&mut self, x: f64) -> Option<SwipeGesture> {
        let start_x = self.start_x.take()?;
        Some(SwipeGesture { start_x, end_x: x })
    }
}
