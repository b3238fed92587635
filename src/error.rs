//! Error types for the onboarding carousel.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Presentation error: {0}")]
    Presentation(#[from] PresentationError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Screen table must contain at least one screen")]
    EmptyScreenTable,

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Action binding refers to screen {index}, but only {total} screens exist")]
    BindingOutOfRange { index: usize, total: usize },
}

/// Failures reported by the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum PresentationError {
    #[error("UI element {element} is missing")]
    MissingElement { element: String },

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Exit animation failed: {0}")]
    Animation(String),
}

/// Failures reported by the application navigation layer.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("Destination {destination} is unavailable: {reason}")]
    Unavailable { destination: String, reason: String },
}

/// Persistence errors for the "seen onboarding" flag.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Errors talking to a running session task.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session has shut down")]
    Closed,

    #[error("Session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type alias for the carousel.
pub type Result<T> = std::result::Result<T, Error>;
