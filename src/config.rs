//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;
use crate::input::{ActionBindings, DEFAULT_SWIPE_THRESHOLD};
use crate::screens::ScreenTable;

/// Default length of the exit transition.
pub const DEFAULT_EXIT_DELAY: Duration = Duration::from_millis(400);

/// Carousel configuration.
#[derive(Debug, Clone)]
pub struct CarouselConfig {
    /// Screens, in display order.
    pub screens: ScreenTable,
    /// How long the exit transition runs before its continuation.
    pub exit_delay: Duration,
    /// Minimum horizontal travel for a touch to count as a swipe.
    pub swipe_threshold: f64,
    /// Which screens carry "get started" / "log in" buttons.
    pub bindings: ActionBindings,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        let screens = ScreenTable::default();
        let bindings = ActionBindings::standard(screens.len());
        Self {
            screens,
            exit_delay: DEFAULT_EXIT_DELAY,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            bindings,
        }
    }
}

impl CarouselConfig {
    /// Defaults overridden by `ONBOARDING_EXIT_DELAY_MS` and
    /// `ONBOARDING_SWIPE_THRESHOLD`. Unparsable values, and thresholds that
    /// are negative or not finite, are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let exit_delay = std::env::var("ONBOARDING_EXIT_DELAY_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.exit_delay);

        let swipe_threshold = std::env::var("ONBOARDING_SWIPE_THRESHOLD")
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(defaults.swipe_threshold);

        Self {
            exit_delay,
            swipe_threshold,
            ..defaults
        }
    }

    pub fn with_exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = delay;
        self
    }

    pub fn with_swipe_threshold(mut self, threshold: f64) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    /// Replace the screen table. Bindings are reset to the standard layout
    /// for the new table.
    pub fn with_screens(mut self, screens: ScreenTable) -> Self {
        self.bindings = ActionBindings::standard(screens.len());
        self.screens = screens;
        self
    }

    pub fn with_bindings(mut self, bindings: ActionBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "swipe_threshold".to_string(),
                message: format!("must be a non-negative number, got {}", self.swipe_threshold),
            });
        }
        if let Some(index) = self.bindings.max_screen() {
            if index >= self.screens.len() {
                return Err(ConfigError::BindingOutOfRange {
                    index,
                    total: self.screens.len(),
                });
            }
        }
        Ok(())
    }
}
