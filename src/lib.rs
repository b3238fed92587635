//! Screen navigation state machine and input routing for an onboarding carousel.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod exit;
pub mod input;
pub mod navigator;
pub mod router;
pub mod screens;
pub mod session;
pub mod state;

pub use collaborators::OnboardingDeps;
pub use config::CarouselConfig;
pub use error::{Error, Result};
pub use exit::{Destination, ExitFlow, ExitPhase};
pub use input::{InputEvent, Key, ScreenAction};
pub use navigator::{Advance, Navigator};
pub use router::{Action, IgnoreReason, InputOutcome, InputRouter, Visit};
pub use session::{SessionHandle, spawn_session};
pub use state::{OnboardingState, TransitionEvent};
