//! Session task — owns one input router and feeds it events in arrival order.
//!
//! All state lives inside the spawned task, so nothing needs a lock: callers
//! only hold a `SessionHandle` and send `InputEvent`s into it. The task also
//! advances the pending exit sequence when its timer expires.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::SessionError;
use crate::input::InputEvent;
use crate::router::{InputOutcome, InputRouter, Visit};

/// Outcomes kept for a handle that is not reading them. Older ones are
/// dropped first.
pub const OUTCOME_CAPACITY: usize = 256;

/// Handle to a running session task.
#[derive(Debug)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<InputEvent>,
    outcomes: broadcast::Receiver<InputOutcome>,
    task: JoinHandle<InputRouter>,
    session_id: Uuid,
    visit: Visit,
}

impl SessionHandle {
    /// Queue an input for the session.
    pub fn send(&self, event: InputEvent) -> Result<(), SessionError> {
        self.tx.send(event).map_err(|_| SessionError::Closed)
    }

    /// Next dispatch outcome, in input order. `None` once the session ended.
    ///
    /// Only the latest `OUTCOME_CAPACITY` outcomes are retained; a handle
    /// that fell further behind skips ahead to the oldest one still held.
    pub async fn next_outcome(&mut self) -> Option<InputOutcome> {
        loop {
            match self.outcomes.recv().await {
                Ok(outcome) => return Some(outcome),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(session = %self.session_id, missed = n, "Outcome reader lagged behind session");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn visit(&self) -> Visit {
        self.visit
    }

    /// Stop accepting input, let any pending exit finish, and hand the
    /// router back.
    pub async fn shutdown(self) -> Result<InputRouter, SessionError> {
        let Self { tx, task, .. } = self;
        drop(tx);
        Ok(task.await?)
    }
}

/// Start `router` and move it into its own task.
pub async fn spawn_session(mut router: InputRouter) -> SessionHandle {
    let visit = router.start().await;
    let session_id = router.session_id();
    let (tx, rx) = mpsc::unbounded_channel();
    let (outcome_tx, outcomes) = broadcast::channel(OUTCOME_CAPACITY);
    let task = tokio::spawn(run(router, rx, outcome_tx));
    SessionHandle {
        tx,
        outcomes,
        task,
        session_id,
        visit,
    }
}

async fn run(
    mut router: InputRouter,
    mut events: mpsc::UnboundedReceiver<InputEvent>,
    outcomes: broadcast::Sender<InputOutcome>,
) -> InputRouter {
    let session_id = router.session_id();
    info!(session = %session_id, screens = router.navigator().total_screens(), "Onboarding session started");

    loop {
        tokio::select! {
            // Exit continuations go first so a queued input never sees a
            // finished-but-unreset exit.
            biased;
            _ = router.exit_ready() => {
                router.finish_exit().await;
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                let outcome = router.dispatch(event);
                // No listener is fine
                let _ = outcomes.send(outcome);
            }
        }
    }

    // Armed exits are never cancelled.
    if let Some(flow) = router.complete_pending_exit().await {
        debug!(%flow, "Finished pending exit after input closed");
    }

    info!(session = %session_id, "Onboarding session ended");
    router
}
