//! Input router — turns every raw input signal into exactly one navigator
//! call or exit flow.
//!
//! Exit flows (complete, skip, get started, log in) all follow the same
//! shape: analytics event → exit animation → navigation signal → reset.
//! Starting a flow arms a `PendingExit`; the continuation runs from
//! [`InputRouter::complete_pending_exit`] once the animation and its delay
//! are over. While an exit is pending every input is ignored, so at most one
//! exit sequence is ever in flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::collaborators::{AppNavigation, OnboardingDeps, OnboardingStore, Presentation};
use crate::config::CarouselConfig;
use crate::error::ConfigError;
use crate::exit::{ExitFlow, ExitPhase, PendingExit};
use crate::input::{ActionBindings, InputEvent, Key, ScreenAction, SwipeDirection, SwipeTracker};
use crate::navigator::{Advance, Navigator};
use crate::state::TransitionEvent;

/// Why an input produced no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// An exit sequence is in flight.
    Exiting,
    /// Requested screen does not exist.
    OutOfRange,
    /// Already on the first screen.
    AtFirstScreen,
    /// No action button of that kind on that screen.
    Unbound,
    /// Action button on a screen that is not showing.
    NotVisible,
    /// Key with no binding.
    UnhandledKey,
    /// Touch that travelled no further than the swipe threshold.
    ShortSwipe,
    /// Touch end with no matching touch start.
    NoTouchStart,
    /// Touch start; waits for its touch end.
    TouchPending,
}

/// The single logical action an input resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigated(TransitionEvent),
    Flow(ExitFlow),
    Ignored(IgnoreReason),
}

/// What dispatching one input did.
#[derive(Debug, Clone, PartialEq)]
pub struct InputOutcome {
    pub action: Action,
    /// The host should suppress the input's default behaviour (e.g. page
    /// scroll on Space).
    pub prevent_default: bool,
}

impl InputOutcome {
    fn new(action: Action) -> Self {
        Self {
            action,
            prevent_default: false,
        }
    }

    fn ignored(reason: IgnoreReason) -> Self {
        Self::new(Action::Ignored(reason))
    }

    fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self.action, Action::Ignored(_))
    }
}

/// Whether the user had seen onboarding before this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    FirstTime,
    Returning,
}

pub struct InputRouter {
    session_id: Uuid,
    navigator: Navigator,
    navigation: Arc<dyn AppNavigation>,
    store: Arc<dyn OnboardingStore>,
    bindings: ActionBindings,
    swipe: SwipeTracker,
    swipe_threshold: f64,
    exit_delay: Duration,
    phase: ExitPhase,
    pending: Option<PendingExit>,
}

impl InputRouter {
    pub fn new(config: CarouselConfig, deps: OnboardingDeps) -> Result<Self, ConfigError> {
        config.validate()?;

        let CarouselConfig {
            screens,
            exit_delay,
            swipe_threshold,
            bindings,
        } = config;

        Ok(Self {
            session_id: Uuid::new_v4(),
            navigator: Navigator::new(screens, deps.presentation, deps.analytics),
            navigation: deps.navigation,
            store: deps.store,
            bindings,
            swipe: SwipeTracker::new(),
            swipe_threshold,
            exit_delay,
            phase: ExitPhase::Idle,
            pending: None,
        })
    }

    /// Identifies this onboarding instance in logs and analytics.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn current_screen(&self) -> usize {
        self.navigator.current_screen()
    }

    pub fn phase(&self) -> ExitPhase {
        self.phase
    }

    pub fn has_pending_exit(&self) -> bool {
        self.pending.is_some()
    }

    /// Begin a session: consult the "seen onboarding" flag, show the first
    /// screen and record `onboarding_started`.
    pub async fn start(&mut self) -> Visit {
        let visit = match self.store.has_seen_onboarding().await {
            Ok(true) => Visit::Returning,
            Ok(false) => Visit::FirstTime,
            Err(e) => {
                warn!("Failed to read onboarding flag, treating as first visit: {}", e);
                Visit::FirstTime
            }
        };

        match visit {
            Visit::Returning => {
                info!(session = %self.session_id, "Returning user, onboarding already seen")
            }
            Visit::FirstTime => {
                info!(session = %self.session_id, "First-time user, showing onboarding");
                if let Err(e) = self.store.mark_seen_onboarding().await {
                    warn!("Failed to persist onboarding flag: {}", e);
                }
            }
        }

        self.navigator.go_to_screen(0);
        self.navigator.analytics().record(
            "onboarding_started",
            json!({
                "session_id": self.session_id,
                "timestamp": Utc::now().to_rfc3339(),
                "returning": visit == Visit::Returning,
            }),
        );
        visit
    }

    /// Route one input.
    pub fn dispatch(&mut self, event: InputEvent) -> InputOutcome {
        if let Some(flow) = self.phase.flow() {
            debug!(?event, %flow, "Ignoring input during exit sequence");
            return InputOutcome::ignored(IgnoreReason::Exiting);
        }

        match event {
            InputEvent::PrimaryClick => self.next(),
            InputEvent::SkipClick => self.begin_flow(ExitFlow::Skip),
            InputEvent::Action { screen, action } => self.screen_action(screen, action),
            InputEvent::IndicatorClick(index) => self.jump(index),
            InputEvent::IndicatorKey { index, key } => match key {
                Key::Enter | Key::Space => self.jump(index).prevent_default(),
                _ => InputOutcome::ignored(IgnoreReason::UnhandledKey),
            },
            InputEvent::Key(key) => self.key(key),
            InputEvent::TouchStart { x } => {
                self.swipe.touch_start(x);
                InputOutcome::ignored(IgnoreReason::TouchPending)
            }
            InputEvent::TouchEnd { x } => self.touch_end(x),
        }
    }

    /// Start a flow directly, as if its trigger had fired.
    pub fn trigger(&mut self, flow: ExitFlow) -> InputOutcome {
        if self.phase.is_exiting() {
            return InputOutcome::ignored(IgnoreReason::Exiting);
        }
        self.begin_flow(flow)
    }

    /// Wait for the pending exit animation, then run its continuation:
    /// signal the destination, restore the view and reset to the first
    /// screen. Returns the finished flow, or `None` if nothing was pending.
    pub async fn complete_pending_exit(&mut self) -> Option<ExitFlow> {
        let pending = self.pending.as_mut()?;
        pending.wait().await;
        self.finish_exit().await
    }

    /// Wait until the pending exit animation is over. Never resolves when no
    /// exit is pending.
    pub(crate) async fn exit_ready(&mut self) {
        match self.pending.as_mut() {
            Some(pending) => pending.wait().await,
            None => std::future::pending().await,
        }
    }

    /// Continuation of an exit whose animation has already finished.
    pub(crate) async fn finish_exit(&mut self) -> Option<ExitFlow> {
        let pending = self.pending.take()?;
        let flow = pending.flow;
        let destination = flow.destination();

        if let Err(e) = self.navigation.proceed_to(destination).await {
            warn!(%flow, %destination, "Navigation after exit failed: {}", e);
        }
        if let Err(e) = self.navigator.presentation().restore_view() {
            warn!(%flow, "Failed to restore view after exit: {}", e);
        }
        self.navigator.reset();

        debug_assert!(self.phase.can_transition_to(ExitPhase::Idle));
        self.phase = ExitPhase::Idle;
        info!(%flow, %destination, "Exit sequence finished");
        Some(flow)
    }

    fn next(&mut self) -> InputOutcome {
        match self.navigator.go_to_next() {
            Advance::Moved(event) => InputOutcome::new(Action::Navigated(event)),
            Advance::Complete => self.begin_flow(ExitFlow::Complete),
        }
    }

    fn previous(&mut self) -> InputOutcome {
        match self.navigator.go_to_previous() {
            Some(event) => InputOutcome::new(Action::Navigated(event)),
            None => InputOutcome::ignored(IgnoreReason::AtFirstScreen),
        }
    }

    fn jump(&mut self, index: usize) -> InputOutcome {
        match self.navigator.go_to_screen(index) {
            Some(event) => InputOutcome::new(Action::Navigated(event)),
            None => InputOutcome::ignored(IgnoreReason::OutOfRange),
        }
    }

    fn key(&mut self, key: Key) -> InputOutcome {
        match key {
            Key::ArrowRight => self.next(),
            Key::ArrowLeft => self.previous(),
            Key::Enter if self.navigator.state().is_first() => self.begin_flow(ExitFlow::GetStarted),
            Key::Enter => self.next(),
            Key::Escape => self.begin_flow(ExitFlow::Skip),
            Key::Space | Key::Other(_) => InputOutcome::ignored(IgnoreReason::UnhandledKey),
        }
    }

    fn screen_action(&mut self, screen: usize, action: ScreenAction) -> InputOutcome {
        if !self.bindings.is_bound(screen, action) {
            debug!(screen, %action, "No action button bound on this screen");
            return InputOutcome::ignored(IgnoreReason::Unbound);
        }
        let current = self.navigator.current_screen();
        if screen != current {
            debug!(screen, current, %action, "Action button on a hidden screen");
            return InputOutcome::ignored(IgnoreReason::NotVisible);
        }
        let flow = match action {
            ScreenAction::GetStarted => ExitFlow::GetStarted,
            ScreenAction::LogIn => ExitFlow::LogIn,
        };
        self.begin_flow(flow)
    }

    fn touch_end(&mut self, x: f64) -> InputOutcome {
        let Some(gesture) = self.swipe.touch_end(x) else {
            return InputOutcome::ignored(IgnoreReason::NoTouchStart);
        };
        match gesture.direction(self.swipe_threshold) {
            Some(SwipeDirection::Right) => self.previous(),
            Some(SwipeDirection::Left) => self.next(),
            None => InputOutcome::ignored(IgnoreReason::ShortSwipe),
        }
    }

    /// Record the flow's analytics event and arm the exit sequence.
    fn begin_flow(&mut self, flow: ExitFlow) -> InputOutcome {
        let current = self.navigator.current_screen();
        let screen_name = self.navigator.screen_name(current).to_string();

        let payload = match flow {
            ExitFlow::Complete => json!({
                "screens_viewed": current + 1,
                "timestamp": Utc::now().to_rfc3339(),
            }),
            ExitFlow::Skip => json!({
                "current_screen": current,
                "screen_name": screen_name,
            }),
            ExitFlow::GetStarted | ExitFlow::LogIn => json!({
                "source": screen_name,
            }),
        };
        info!(%flow, screen = current, "Leaving onboarding");
        self.navigator.analytics().record(flow.event_name(), payload);

        let target = ExitPhase::Exiting(flow);
        debug_assert!(self.phase.can_transition_to(target));
        self.phase = target;
        self.pending = Some(PendingExit::new(
            flow,
            exit_animation(Arc::clone(self.navigator.presentation()), self.exit_delay),
        ));

        InputOutcome::new(Action::Flow(flow))
    }
}

/// Play the exit animation and wait out `delay`, whichever finishes last.
fn exit_animation(
    presentation: Arc<dyn Presentation>,
    delay: Duration,
) -> futures::future::BoxFuture<'static, ()> {
    Box::pin(async move {
        let (played, ()) = tokio::join!(
            presentation.play_exit_animation(delay),
            tokio::time::sleep(delay)
        );
        if let Err(e) = played {
            warn!("Exit animation failed: {}", e);
        }
    })
}

impl std::fmt::Debug for InputRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRouter")
            .field("session_id", &self.session_id)
            .field("navigator", &self.navigator)
            .field("phase", &self.phase)
            .field("exit_delay", &self.exit_delay)
            .finish_non_exhaustive()
    }
}
