//! Carousel state: which screen is showing, and the transition records it emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of the carousel.
///
/// `current_screen < total_screens` holds for every value this type hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingState {
    current_screen: usize,
    total_screens: usize,
}

impl OnboardingState {
    /// Start on the first screen. `total_screens` must be non-zero.
    pub(crate) fn new(total_screens: usize) -> Self {
        debug_assert!(total_screens > 0);
        Self {
            current_screen: 0,
            total_screens,
        }
    }

    pub fn current_screen(&self) -> usize {
        self.current_screen
    }

    pub fn total_screens(&self) -> usize {
        self.total_screens
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.total_screens
    }

    pub fn is_first(&self) -> bool {
        self.current_screen == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_screen + 1 == self.total_screens
    }

    /// Move to `index`, returning the previous position. Out-of-range
    /// indices leave the state untouched and return `None`.
    pub(crate) fn move_to(&mut self, index: usize) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        let previous = self.current_screen;
        self.current_screen = index;
        Some(previous)
    }
}

/// Direction of a screen change, used by the view to pick its transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    Stay,
}

/// A screen change handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenChange {
    pub from: usize,
    pub to: usize,
}

impl ScreenChange {
    pub fn direction(&self) -> Direction {
        use std::cmp::Ordering;
        match self.to.cmp(&self.from) {
            Ordering::Greater => Direction::Forward,
            Ordering::Less => Direction::Backward,
            Ordering::Equal => Direction::Stay,
        }
    }

    /// The leaving screen slides out to the left only on forward moves.
    pub fn exits_left(&self) -> bool {
        self.direction() == Direction::Forward
    }
}

/// Record of one completed screen transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub from_index: usize,
    pub to_index: usize,
    pub screen_name: String,
    /// Per-session counter, starting at 1.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
}

impl TransitionEvent {
    pub fn change(&self) -> ScreenChange {
        ScreenChange {
            from: self.from_index,
            to: self.to_index,
        }
    }
}
