//! Navigator — the single authority over which screen is showing.
//!
//! Every transition updates the state first, then pushes the dependent
//! presentation updates in a fixed order (active screen, indicator, button
//! label, logo) and finally records a `screen_view` analytics event. A failing
//! presentation update is logged and skipped; it never rolls the state back
//! and never stops the updates after it.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::collaborators::{Analytics, Presentation};
use crate::error::PresentationError;
use crate::screens::{ScreenDescriptor, ScreenTable};
use crate::state::{OnboardingState, ScreenChange, TransitionEvent};

/// Result of asking for the next screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved one screen forward.
    Moved(TransitionEvent),
    /// Already on the last screen; onboarding should complete.
    Complete,
}

pub struct Navigator {
    state: OnboardingState,
    screens: ScreenTable,
    presentation: Arc<dyn Presentation>,
    analytics: Arc<dyn Analytics>,
    sequence: u64,
}

impl Navigator {
    /// Create a navigator positioned on the first screen. Nothing is pushed
    /// to the view until the first transition.
    pub fn new(
        screens: ScreenTable,
        presentation: Arc<dyn Presentation>,
        analytics: Arc<dyn Analytics>,
    ) -> Self {
        Self {
            state: OnboardingState::new(screens.len()),
            screens,
            presentation,
            analytics,
            sequence: 0,
        }
    }

    pub fn state(&self) -> OnboardingState {
        self.state
    }

    pub fn current_screen(&self) -> usize {
        self.state.current_screen()
    }

    pub fn total_screens(&self) -> usize {
        self.state.total_screens()
    }

    pub fn screens(&self) -> &ScreenTable {
        &self.screens
    }

    pub fn current_descriptor(&self) -> Option<&ScreenDescriptor> {
        self.screens.get(self.state.current_screen())
    }

    /// Analytics name of the screen currently showing.
    pub fn current_name(&self) -> &str {
        self.screens.name(self.state.current_screen())
    }

    /// Analytics name of `index` (`"unknown"` when out of range).
    pub fn screen_name(&self, index: usize) -> &str {
        self.screens.name(index)
    }

    pub(crate) fn presentation(&self) -> &Arc<dyn Presentation> {
        &self.presentation
    }

    pub(crate) fn analytics(&self) -> &Arc<dyn Analytics> {
        &self.analytics
    }

    /// Show screen `index`.
    ///
    /// Out-of-range indices are ignored: no state change, no side effects,
    /// `None` is returned.
    pub fn go_to_screen(&mut self, index: usize) -> Option<TransitionEvent> {
        let (label, logo_visible) = match self.screens.get(index) {
            Some(screen) => (screen.button_label(), screen.logo_visible()),
            None => {
                debug!(index, total = self.state.total_screens(), "Ignoring out-of-range screen");
                return None;
            }
        };
        let previous = self.state.move_to(index)?;

        self.sequence += 1;
        let change = ScreenChange {
            from: previous,
            to: index,
        };

        self.apply("active screen", self.presentation.set_active_screen(change));
        self.apply("indicator", self.presentation.set_indicator(index));
        self.apply("button label", self.presentation.set_button_label(label));
        self.apply("logo", self.presentation.set_logo_visible(logo_visible));

        let event = TransitionEvent {
            from_index: previous,
            to_index: index,
            screen_name: self.screens.name(index).to_string(),
            sequence: self.sequence,
            timestamp: Utc::now(),
        };

        info!(from = previous, to = index, screen = %event.screen_name, "Screen changed");
        self.analytics.record(
            "screen_view",
            json!({
                "screen_index": index,
                "screen_name": event.screen_name,
                "previous_index": previous,
                "sequence": event.sequence,
            }),
        );

        Some(event)
    }

    /// Move one screen forward, or report that the last screen was reached.
    pub fn go_to_next(&mut self) -> Advance {
        if self.state.is_last() {
            return Advance::Complete;
        }
        match self.go_to_screen(self.state.current_screen() + 1) {
            Some(event) => Advance::Moved(event),
            None => Advance::Complete,
        }
    }

    /// Move one screen back. No-op on the first screen.
    pub fn go_to_previous(&mut self) -> Option<TransitionEvent> {
        if self.state.is_first() {
            return None;
        }
        self.go_to_screen(self.state.current_screen() - 1)
    }

    /// Return to the first screen.
    pub fn reset(&mut self) -> Option<TransitionEvent> {
        self.go_to_screen(0)
    }

    fn apply(&self, what: &str, result: Result<(), PresentationError>) {
        if let Err(e) = result {
            warn!(update = what, screen = self.state.current_screen(), "Presentation update failed: {}", e);
        }
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("state", &self.state)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{Element, RecordingAnalytics, ViewModel};
    use crate::screens::{GET_STARTED_LABEL, NEXT_LABEL};

    fn navigator_with(view: ViewModel) -> (Navigator, Arc<ViewModel>, Arc<RecordingAnalytics>) {
        let view = Arc::new(view);
        let analytics = Arc::new(RecordingAnalytics::new());
        let nav = Navigator::new(
            ScreenTable::default(),
            Arc::clone(&view) as Arc<dyn Presentation>,
            Arc::clone(&analytics) as Arc<dyn Analytics>,
        );
        (nav, view, analytics)
    }

    fn navigator() -> (Navigator, Arc<ViewModel>, Arc<RecordingAnalytics>) {
        navigator_with(ViewModel::new())
    }

    #[test]
    fn out_of_range_is_silent_noop() {
        let (mut nav, view, analytics) = navigator();
        nav.go_to_screen(1);
        analytics.drain();
        let before = view.snapshot();

        for index in [3, 4, 100, usize::MAX] {
            assert!(nav.go_to_screen(index).is_none());
        }

        assert_eq!(nav.current_screen(), 1);
        assert_eq!(view.snapshot(), before);
        assert!(analytics.events().is_empty());
    }

    #[test]
    fn valid_index_updates_indicator_label_and_logo() {
        let (mut nav, view, _analytics) = navigator();
        let expected = [
            (0, NEXT_LABEL, true),
            (1, NEXT_LABEL, false),
            (2, GET_STARTED_LABEL, false),
        ];
        // Jump around, including back to screens already seen.
        for index in [2, 0, 1, 2, 1, 0] {
            nav.go_to_screen(index).unwrap();
            let (_, label, logo) = expected[index];
            let snap = view.snapshot();
            assert_eq!(snap.active_screen, Some(index));
            assert_eq!(snap.active_indicator, Some(index));
            assert_eq!(snap.button_label, label, "label on screen {index}");
            assert_eq!(snap.logo_visible, logo, "logo on screen {index}");
        }
    }

    #[test]
    fn screen_view_event_carries_index_and_name() {
        let (mut nav, _view, analytics) = navigator();
        let event = nav.go_to_screen(1).unwrap();
        assert_eq!(event.from_index, 0);
        assert_eq!(event.to_index, 1);
        assert_eq!(event.screen_name, "service_providers");
        assert_eq!(event.sequence, 1);

        let recorded = analytics.last("screen_view").unwrap();
        assert_eq!(recorded.payload["screen_index"], 1);
        assert_eq!(recorded.payload["screen_name"], "service_providers");
        assert_eq!(recorded.payload["previous_index"], 0);
    }

    #[test]
    fn sequence_increments_per_transition() {
        let (mut nav, _view, _analytics) = navigator();
        let a = nav.go_to_screen(0).unwrap();
        let b = nav.go_to_screen(2).unwrap();
        nav.go_to_screen(9);
        let c = nav.go_to_screen(1).unwrap();
        assert_eq!((a.sequence, b.sequence, c.sequence), (1, 2, 3));
    }

    #[test]
    fn next_walks_screens_then_completes() {
        let (mut nav, _view, _analytics) = navigator();
        let mut visited = vec![nav.current_screen()];
        loop {
            match nav.go_to_next() {
                Advance::Moved(event) => visited.push(event.to_index),
                Advance::Complete => break,
            }
        }
        assert_eq!(visited, vec![0, 1, 2]);
        assert_eq!(nav.current_screen(), 2, "completion does not move the state");
        assert_eq!(nav.go_to_next(), Advance::Complete);
    }

    #[test]
    fn previous_is_noop_on_first_screen() {
        let (mut nav, _view, analytics) = navigator();
        assert!(nav.go_to_previous().is_none());
        assert_eq!(nav.current_screen(), 0);
        assert!(analytics.events().is_empty());

        nav.go_to_screen(2);
        let event = nav.go_to_previous().unwrap();
        assert_eq!(event.to_index, 1);
        assert_eq!(nav.current_screen(), 1);
    }

    #[test]
    fn reset_returns_to_first_screen() {
        let (mut nav, view, _analytics) = navigator();
        nav.go_to_screen(2);
        let event = nav.reset().unwrap();
        assert_eq!(event.from_index, 2);
        assert_eq!(nav.current_screen(), 0);
        assert!(view.snapshot().logo_visible);
        assert_eq!(nav.current_name(), "welcome");
    }

    #[test]
    fn presentation_failure_does_not_block_state_or_later_updates() {
        let (mut nav, view, analytics) =
            navigator_with(ViewModel::new().without(Element::Indicators));
        let event = nav.go_to_screen(2);
        assert!(event.is_some());
        assert_eq!(nav.current_screen(), 2);

        let snap = view.snapshot();
        assert_eq!(snap.active_indicator, None);
        assert_eq!(snap.active_screen, Some(2));
        assert_eq!(snap.button_label, GET_STARTED_LABEL);
        assert!(!snap.logo_visible);
        assert_eq!(analytics.names(), vec!["screen_view"]);
    }

    #[test]
    fn custom_table_bounds() {
        let view = Arc::new(ViewModel::new());
        let analytics = Arc::new(RecordingAnalytics::new());
        let mut nav = Navigator::new(
            ScreenTable::new(["one", "two"]).unwrap(),
            view.clone(),
            analytics,
        );
        assert_eq!(nav.total_screens(), 2);
        assert!(nav.go_to_screen(2).is_none());
        assert!(matches!(nav.go_to_next(), Advance::Moved(_)));
        assert_eq!(view.snapshot().button_label, GET_STARTED_LABEL);
        assert_eq!(nav.go_to_next(), Advance::Complete);
    }

    /// Presentation and analytics sharing one call log.
    #[derive(Default)]
    struct CallLog {
        calls: std::sync::Mutex<Vec<String>>,
        failing: Option<&'static str>,
    }

    impl CallLog {
        fn push(&self, call: String) -> Result<(), PresentationError> {
            let failed = self.failing.is_some_and(|f| call.starts_with(f));
            self.calls.lock().unwrap().push(call);
            if failed {
                return Err(PresentationError::Render("forced".to_string()));
            }
            Ok(())
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    #[async_trait::async_trait]
    impl Presentation for CallLog {
        fn set_active_screen(&self, change: ScreenChange) -> Result<(), PresentationError> {
            self.push(format!("active_screen {}->{}", change.from, change.to))
        }

        fn set_indicator(&self, index: usize) -> Result<(), PresentationError> {
            self.push(format!("indicator {index}"))
        }

        fn set_button_label(&self, label: &str) -> Result<(), PresentationError> {
            self.push(format!("label {label}"))
        }

        fn set_logo_visible(&self, visible: bool) -> Result<(), PresentationError> {
            self.push(format!("logo {visible}"))
        }

        async fn play_exit_animation(
            &self,
            _duration: std::time::Duration,
        ) -> Result<(), PresentationError> {
            Ok(())
        }
    }

    impl Analytics for CallLog {
        fn record(&self, event: &str, payload: serde_json::Value) {
            let _ = self.push(format!("{event} {}", payload["screen_index"]));
        }
    }

    fn logged_navigator(log: CallLog) -> (Navigator, Arc<CallLog>) {
        let log = Arc::new(log);
        let nav = Navigator::new(ScreenTable::default(), log.clone(), log.clone());
        (nav, log)
    }

    #[test]
    fn side_effects_run_in_order_with_screen_view_last() {
        let finish = format!("label {GET_STARTED_LABEL}");
        let next = format!("label {NEXT_LABEL}");
        let (mut nav, log) = logged_navigator(CallLog::default());
        nav.go_to_screen(2).unwrap();
        assert_eq!(
            log.take(),
            vec![
                "active_screen 0->2",
                "indicator 2",
                finish.as_str(),
                "logo false",
                "screen_view 2",
            ]
        );

        nav.go_to_previous().unwrap();
        assert_eq!(
            log.take(),
            vec![
                "active_screen 2->1",
                "indicator 1",
                next.as_str(),
                "logo false",
                "screen_view 1",
            ]
        );
    }

    #[test]
    fn failed_update_keeps_order_of_the_rest() {
        let (mut nav, log) = logged_navigator(CallLog {
            failing: Some("active_screen"),
            ..CallLog::default()
        });
        nav.go_to_screen(1).unwrap();
        let calls = log.take();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], "active_screen 0->1");
        assert_eq!(calls[4], "screen_view 1");
    }

    #[test]
    fn out_of_range_makes_no_calls() {
        let (mut nav, log) = logged_navigator(CallLog::default());
        assert!(nav.go_to_screen(3).is_none());
        assert!(log.take().is_empty());
    }
}
