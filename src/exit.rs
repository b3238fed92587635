//! Exit flows and the two-phase exit sequence.
//!
//! Every way out of the carousel (finishing, skipping, or one of the
//! per-screen sign-up / log-in buttons) runs the same sequence:
//! analytics event → exit animation → navigation signal → reset.
//! `ExitPhase` tracks whether such a sequence is in flight.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Where the application should go once the carousel is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    MainApp,
    SignUp,
    Login,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MainApp => "main_app",
            Self::SignUp => "sign_up",
            Self::Login => "login",
        };
        write!(f, "{s}")
    }
}

/// The named ways of leaving onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitFlow {
    /// Advanced past the last screen.
    Complete,
    /// Skip button or Escape.
    Skip,
    /// A per-screen "get started" button, or Enter on the first screen.
    GetStarted,
    /// A per-screen "log in" button.
    LogIn,
}

impl ExitFlow {
    /// Analytics event recorded when the flow starts.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Complete => "onboarding_completed",
            Self::Skip => "onboarding_skipped",
            Self::GetStarted => "get_started_clicked",
            Self::LogIn => "login_clicked",
        }
    }

    pub fn destination(&self) -> Destination {
        match self {
            Self::Complete | Self::Skip => Destination::MainApp,
            Self::GetStarted => Destination::SignUp,
            Self::LogIn => Destination::Login,
        }
    }
}

impl std::fmt::Display for ExitFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Complete => "complete",
            Self::Skip => "skip",
            Self::GetStarted => "get_started",
            Self::LogIn => "log_in",
        };
        write!(f, "{s}")
    }
}

/// Whether an exit sequence is in flight.
///
/// `Idle → Exiting(flow)` when a flow starts, `Exiting → Idle` once the
/// continuation has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "flow")]
pub enum ExitPhase {
    #[default]
    Idle,
    Exiting(ExitFlow),
}

impl ExitPhase {
    pub fn can_transition_to(&self, target: ExitPhase) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Exiting(_)) | (Self::Exiting(_), Self::Idle)
        )
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self, Self::Exiting(_))
    }

    pub fn flow(&self) -> Option<ExitFlow> {
        match self {
            Self::Idle => None,
            Self::Exiting(flow) => Some(*flow),
        }
    }
}

impl std::fmt::Display for ExitPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Exiting(flow) => write!(f, "exiting({flow})"),
        }
    }
}

/// An armed exit sequence: resolves once the exit animation and its delay
/// have both finished. Never cancelled.
pub struct PendingExit {
    pub flow: ExitFlow,
    pub(crate) completion: BoxFuture<'static, ()>,
}

impl PendingExit {
    pub(crate) fn new(flow: ExitFlow, completion: BoxFuture<'static, ()>) -> Self {
        Self { flow, completion }
    }

    /// Wait for the exit animation to finish.
    pub(crate) async fn wait(&mut self) {
        (&mut self.completion).await
    }
}

impl std::fmt::Debug for PendingExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingExit")
            .field("flow", &self.flow)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flows_map_to_events_and_destinations() {
        use ExitFlow::*;
        let expected = [
            (Complete, "onboarding_completed", Destination::MainApp),
            (Skip, "onboarding_skipped", Destination::MainApp),
            (GetStarted, "get_started_clicked", Destination::SignUp),
            (LogIn, "login_clicked", Destination::Login),
        ];
        for (flow, event, destination) in expected {
            assert_eq!(flow.event_name(), event);
            assert_eq!(flow.destination(), destination, "{flow}");
        }
    }

    #[test]
    fn phase_transitions() {
        let idle = ExitPhase::Idle;
        let exiting = ExitPhase::Exiting(ExitFlow::Skip);

        assert!(idle.can_transition_to(exiting));
        assert!(exiting.can_transition_to(idle));
        assert!(!idle.can_transition_to(idle));
        assert!(!exiting.can_transition_to(ExitPhase::Exiting(ExitFlow::Complete)));
    }

    #[test]
    fn phase_flow_accessor() {
        assert_eq!(ExitPhase::default(), ExitPhase::Idle);
        assert_eq!(ExitPhase::Idle.flow(), None);
        assert!(!ExitPhase::Idle.is_exiting());

        let phase = ExitPhase::Exiting(ExitFlow::LogIn);
        assert_eq!(phase.flow(), Some(ExitFlow::LogIn));
        assert!(phase.is_exiting());
        assert_eq!(phase.to_string(), "exiting(log_in)");
    }

    #[test]
    fn display_matches_serde() {
        use ExitFlow::*;
        for flow in [Complete, Skip, GetStarted, LogIn] {
            let json = serde_json::to_string(&flow).unwrap();
            assert_eq!(format!("\"{flow}\""), json, "Display and serde should match for {flow:?}");
        }
        for destination in [Destination::MainApp, Destination::SignUp, Destination::Login] {
            let json = serde_json::to_string(&destination).unwrap();
            assert_eq!(format!("\"{destination}\""), json);
        }
    }

    #[tokio::test]
    async fn pending_exit_resolves() {
        let mut pending = PendingExit::new(ExitFlow::Skip, Box::pin(async {}));
        pending.wait().await;
        assert_eq!(pending.flow, ExitFlow::Skip);
    }
}
