//! Typewriter effect for the hero tagline.
//!
//! [`PhraseCycleState`] is a pure state machine: each tick types or erases
//! one character of the current phrase, flips between typing and deleting at
//! the ends, and moves to the next phrase once the text is fully erased.
//! [`Typewriter`] drives it from a [`Scheduler`] with exactly one pending
//! timer at a time.

use crate::config::HeroConfig;
use crate::error::ConfigError;
use crate::scheduler::{Scheduler, TaskHandle, TaskSlot};
use std::sync::Arc;
use tracing::{debug, trace};

/// Tick delays for typing and erasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingSpeeds {
    /// Delay before the next typed character
    pub typing_ms: u32,
    /// Delay before the next erased character
    pub deleting_ms: u32,
}

impl Default for TypingSpeeds {
    fn default() -> Self {
        Self {
            typing_ms: 120,
            deleting_ms: 60,
        }
    }
}

impl TypingSpeeds {
    /// Delay of the tick that follows a state with the given direction.
    #[must_use]
    pub const fn delay(self, is_deleting: bool) -> u32 {
        if is_deleting {
            self.deleting_ms
        } else {
            self.typing_ms
        }
    }
}

impl From<&HeroConfig> for TypingSpeeds {
    fn from(config: &HeroConfig) -> Self {
        Self {
            typing_ms: config.typing_speed_ms,
            deleting_ms: config.deleting_speed_ms,
        }
    }
}

// =============================================================================
// PhraseCycleState
// =============================================================================

/// Typewriter state.
///
/// `typed_text` is always a prefix of the phrase selected by
/// `phrase_index % phrases.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseCycleState {
    phrases: Arc<[String]>,
    phrase_index: usize,
    typed_text: String,
    is_deleting: bool,
}

impl PhraseCycleState {
    /// Fresh state at the start of the first phrase.
    pub fn new(phrases: Vec<String>) -> Result<Self, ConfigError> {
        if phrases.is_empty() {
            return Err(ConfigError::EmptyPhrases);
        }
        Ok(Self {
            phrases: phrases.into(),
            phrase_index: 0,
            typed_text: String::new(),
            is_deleting: false,
        })
    }

    /// All phrases, in cycle order.
    #[must_use]
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Monotonic phrase counter. Select with [`current_phrase`](Self::current_phrase).
    #[must_use]
    pub const fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    /// Visible text.
    #[must_use]
    pub fn typed_text(&self) -> &str {
        &self.typed_text
    }

    /// Whether the text is being erased.
    #[must_use]
    pub const fn is_deleting(&self) -> bool {
        self.is_deleting
    }

    /// The phrase being typed or erased.
    #[must_use]
    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.phrase_index % self.phrases.len()]
    }

    /// Pure transition: the next state and the delay before the tick after it.
    #[must_use]
    pub fn advance(&self, speeds: TypingSpeeds) -> (Self, u32) {
        let mut next = self.clone();
        let delay = next.step(speeds);
        (next, delay)
    }

    /// In-place transition. Returns the delay before the next tick.
    pub fn step(&mut self, speeds: TypingSpeeds) -> u32 {
        let phrase_len = self.current_phrase().len();

        if !self.is_deleting && self.typed_text.len() == phrase_len {
            self.is_deleting = true;
            debug!(phrase = self.current_phrase(), "typewriter: phrase complete, erasing");
        } else if self.is_deleting && self.typed_text.is_empty() {
            self.is_deleting = false;
            self.phrase_index = self.phrase_index.wrapping_add(1);
            debug!(
                phrase_index = self.phrase_index,
                phrase = self.current_phrase(),
                "typewriter: next phrase"
            );
        } else if self.is_deleting {
            self.typed_text.pop();
        } else {
            let typed = self.typed_text.len();
            if let Some(c) = self.current_phrase()[typed..].chars().next() {
                self.typed_text.push(c);
            }
        }

        trace!(typed = %self.typed_text, deleting = self.is_deleting, "typewriter tick");
        speeds.delay(self.is_deleting)
    }
}

// =============================================================================
// Typewriter - scheduler-driven cycler
// =============================================================================

/// Drives a [`PhraseCycleState`] from timer callbacks.
#[derive(Debug)]
pub struct Typewriter {
    state: PhraseCycleState,
    speeds: TypingSpeeds,
    timer: TaskSlot,
    disposed: bool,
}

impl Typewriter {
    /// Build from the hero manifest section.
    pub fn new(config: &HeroConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_state(
            PhraseCycleState::new(config.phrases.clone())?,
            TypingSpeeds::from(config),
        ))
    }

    /// Build from an explicit state.
    #[must_use]
    pub const fn with_state(state: PhraseCycleState, speeds: TypingSpeeds) -> Self {
        Self {
            state,
            speeds,
            timer: TaskSlot::new(),
            disposed: false,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &PhraseCycleState {
        &self.state
    }

    /// Handle of the pending tick.
    #[must_use]
    pub const fn pending(&self) -> Option<TaskHandle> {
        self.timer.pending()
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Schedule the first tick. No-op if already running or torn down.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        if self.disposed || self.timer.is_pending() {
            return;
        }
        let delay = self.speeds.delay(self.state.is_deleting());
        let handle = scheduler.schedule_after(delay);
        self.timer.replace(scheduler, handle);
    }

    /// Handle a fired timer. Returns `true` if it was this typewriter's tick.
    pub fn on_timer(&mut self, handle: TaskHandle, scheduler: &mut dyn Scheduler) -> bool {
        if self.disposed || !self.timer.claim(handle) {
            return false;
        }
        let delay = self.state.step(self.speeds);
        let next = scheduler.schedule_after(delay);
        self.timer.replace(scheduler, next);
        true
    }

    /// Cancel the pending tick and ignore all future deliveries. Idempotent.
    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.timer.cancel(scheduler);
        if !self.disposed {
            debug!("typewriter: torn down");
        }
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use proptest::prelude::*;

    fn state(phrases: &[&str]) -> PhraseCycleState {
        PhraseCycleState::new(phrases.iter().map(|s| (*s).to_string()).collect()).unwrap()
    }

    // -------------------------------------------------------------------------
    // PhraseCycleState
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_rejects_empty_phrases() {
        assert!(matches!(
            PhraseCycleState::new(vec![]),
            Err(ConfigError::EmptyPhrases)
        ));
    }

    #[test]
    fn test_initial_state() {
        let s = state(&["Go"]);
        assert_eq!(s.phrase_index(), 0);
        assert_eq!(s.typed_text(), "");
        assert!(!s.is_deleting());
        assert_eq!(s.current_phrase(), "Go");
    }

    #[test]
    fn test_types_one_character_per_tick() {
        let speeds = TypingSpeeds::default();
        let (s1, d1) = state(&["Go"]).advance(speeds);
        assert_eq!(s1.typed_text(), "G");
        assert_eq!(d1, 120);
        let (s2, _) = s1.advance(speeds);
        assert_eq!(s2.typed_text(), "Go");
        assert!(!s2.is_deleting());
    }

    #[test]
    fn test_full_phrase_starts_deleting_without_erasing() {
        let speeds = TypingSpeeds::default();
        let mut s = state(&["Go"]);
        s.step(speeds);
        s.step(speeds);

        let (next, delay) = s.advance(speeds);
        assert!(next.is_deleting());
        assert_eq!(next.typed_text(), "Go");
        assert_eq!(delay, 60);
    }

    #[test]
    fn test_cleared_text_moves_to_next_phrase() {
        let speeds = TypingSpeeds::default();
        let mut s = state(&["a", "b"]);
        s.step(speeds); // "a"
        s.step(speeds); // deleting
        s.step(speeds); // ""
        assert!(s.is_deleting());
        assert_eq!(s.typed_text(), "");

        let delay = s.step(speeds);
        assert!(!s.is_deleting());
        assert_eq!(s.phrase_index(), 1);
        assert_eq!(s.current_phrase(), "b");
        assert_eq!(s.typed_text(), "");
        assert_eq!(delay, 120);
    }

    #[test]
    fn test_phrase_index_wraps_by_modulo() {
        let speeds = TypingSpeeds::default();
        let mut s = state(&["x"]);
        // type, start deleting, erase, advance
        for _ in 0..4 {
            s.step(speeds);
        }
        assert_eq!(s.phrase_index(), 1);
        assert_eq!(s.current_phrase(), "x");
    }

    #[test]
    fn test_multibyte_characters() {
        let speeds = TypingSpeeds::default();
        let mut s = state(&["héé"]);
        s.step(speeds);
        s.step(speeds);
        assert_eq!(s.typed_text(), "hé");
        s.step(speeds);
        s.step(speeds);
        s.step(speeds);
        assert_eq!(s.typed_text(), "hé");
        assert!(s.is_deleting());
    }

    #[test]
    fn test_empty_phrase_is_skipped_through() {
        let speeds = TypingSpeeds::default();
        let mut s = state(&["", "b"]);
        s.step(speeds);
        assert!(s.is_deleting());
        s.step(speeds);
        assert_eq!(s.current_phrase(), "b");
    }

    // -------------------------------------------------------------------------
    // Typewriter
    // -------------------------------------------------------------------------

    fn typewriter(phrases: &[&str], typing_ms: u32, deleting_ms: u32) -> Typewriter {
        Typewriter::with_state(
            state(phrases),
            TypingSpeeds {
                typing_ms,
                deleting_ms,
            },
        )
    }

    fn run(tw: &mut Typewriter, sched: &mut ManualScheduler, until: f64) {
        while let Some(fired) = sched.pop_due(until) {
            tw.on_timer(fired.handle, sched);
        }
        sched.settle(until);
    }

    #[test]
    fn test_start_schedules_one_tick() {
        let mut sched = ManualScheduler::new();
        let mut tw = typewriter(&["Go"], 100, 50);
        tw.start(&mut sched);
        tw.start(&mut sched);
        assert_eq!(sched.pending_count(), 1);
        assert_eq!(sched.next_due(), Some(100.0));
    }

    #[test]
    fn test_ticks_follow_delays() {
        let mut sched = ManualScheduler::new();
        let mut tw = typewriter(&["Go"], 100, 50);
        tw.start(&mut sched);

        run(&mut tw, &mut sched, 200.0);
        assert_eq!(tw.state().typed_text(), "Go");

        run(&mut tw, &mut sched, 300.0);
        assert!(tw.state().is_deleting());
        // the first erase follows after the deleting delay
        assert_eq!(sched.next_due(), Some(350.0));
    }

    #[test]
    fn test_stale_handle_ignored() {
        let mut sched = ManualScheduler::new();
        let mut tw = typewriter(&["Go"], 100, 50);
        tw.start(&mut sched);
        assert!(!tw.on_timer(TaskHandle::new(4242), &mut sched));
        assert_eq!(tw.state().typed_text(), "");
    }

    #[test]
    fn test_teardown_cancels_pending_tick() {
        let mut sched = ManualScheduler::new();
        let mut tw = typewriter(&["Go"], 100, 50);
        tw.start(&mut sched);
        let handle = tw.pending().unwrap();

        tw.teardown(&mut sched);
        tw.teardown(&mut sched);
        assert_eq!(sched.pending_count(), 0);
        assert!(!tw.on_timer(handle, &mut sched));
        assert_eq!(tw.state().typed_text(), "");

        tw.start(&mut sched);
        assert_eq!(sched.pending_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_typed_text_is_prefix(
            phrases in prop::collection::vec("[a-zé ]{0,8}", 1..4),
            ticks in 0usize..200,
        ) {
            let mut s = PhraseCycleState::new(phrases).unwrap();
            for _ in 0..ticks {
                s.step(TypingSpeeds::default());
                prop_assert!(s.current_phrase().starts_with(s.typed_text()));
            }
        }

        #[test]
        fn prop_each_phrase_fully_typed_then_erased(
            phrases in prop::collection::vec("[a-z]{1,6}", 1..4),
        ) {
            let mut s = PhraseCycleState::new(phrases.clone()).unwrap();
            let speeds = TypingSpeeds::default();
            for round in 0..phrases.len() * 2 {
                let phrase = phrases[round % phrases.len()].clone();
                let mut saw_full = false;
                let start_index = s.phrase_index();
                while s.phrase_index() == start_index {
                    if s.typed_text() == phrase {
                        saw_full = true;
                    }
                    s.step(speeds);
                }
                prop_assert!(saw_full);
                prop_assert_eq!(s.phrase_index(), start_index + 1);
                prop_assert_eq!(s.typed_text(), "");
            }
        }
    }
}
