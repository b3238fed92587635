//! Navigation stand-in that logs where the app would go next.

use std::sync::Mutex;
use std::sync::PoisonError;

use async_trait::async_trait;
use tracing::info;

use super::AppNavigation;
use crate::error::NavigationError;
use crate::exit::Destination;

/// Logs each destination and remembers the history.
#[derive(Debug, Default)]
pub struct LogNavigation {
    history: Mutex<Vec<Destination>>,
}

impl LogNavigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destinations signalled so far, oldest first.
    pub fn history(&self) -> Vec<Destination> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AppNavigation for LogNavigation {
    async fn proceed_to(&self, destination: Destination) -> Result<(), NavigationError> {
        let message = match destination {
            Destination::MainApp => "Leaving onboarding for the main app",
            Destination::SignUp => "Redirecting to sign-up",
            Destination::Login => "Redirecting to login",
        };
        info!(%destination, "{}", message);
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(destination);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn history_keeps_order() {
        let nav = LogNavigation::new();
        nav.proceed_to(Destination::SignUp).await.unwrap();
        nav.proceed_to(Destination::MainApp).await.unwrap();
        assert_eq!(nav.history(), vec![Destination::SignUp, Destination::MainApp]);
    }
}
