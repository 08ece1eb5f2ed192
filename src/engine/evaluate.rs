// src/engine/evaluate.rs

//! The action evaluator: the central state machine. Judges one submitted
//! action against the session's current step, updates the session record,
//! and decides whether the student advances, holds, or errored.

use std::sync::Arc;

use crate::coach::Coach;
use crate::scenario::{Scenario, Severity, Step, TERMINAL_STEP};
use crate::session::SessionStore;

use super::error::EngineError;
use super::hint::{self, HintResult};

/// Acknowledgement returned with every correct action.
pub const CORRECT_MESSAGE: &str = "✓ Good work! Move to the next step.";

/// Outcome of one evaluation. Non-correct outcomes never advance the chain.
#[derive(Debug)]
pub enum Evaluation {
    Correct {
        /// Successor step object; `None` only at the terminal transition.
        next_step: Option<Step>,
        complete: bool,
    },
    Incorrect {
        consequence: String,
        severity: Severity,
        hint: HintResult,
        current_step: Step,
    },
}

/// Evaluator over one immutable scenario graph. Holds the session store and
/// the coach boundary; one instance serves all sessions.
pub struct Engine {
    scenario: &'static Scenario,
    sessions: Arc<SessionStore>,
    coach: Arc<Coach>,
}

impl Engine {
    pub fn new(scenario: &'static Scenario, sessions: Arc<SessionStore>, coach: Arc<Coach>) -> Self {
        Self {
            scenario,
            sessions,
            coach,
        }
    }

    pub fn scenario(&self) -> &'static Scenario {
        self.scenario
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn coach(&self) -> &Coach {
        &self.coach
    }

    /// Judge one action. Mutates exactly one session's history and at most
    /// one of its counters. Deliberately not idempotent: replaying a triple
    /// appends and increments again, so repeated mistakes escalate the hint
    /// tier.
    ///
    /// The per-session lock is held across the whole read-append-increment
    /// sequence, including the coach call, so concurrent calls on one
    /// session serialize while other sessions are unaffected.
    pub async fn evaluate(
        &self,
        session_id: &str,
        step_id: &str,
        action: &str,
    ) -> Result<Evaluation, EngineError> {
        // Unknown step fails before any session mutation.
        let step = self
            .scenario
            .step_by_id(step_id)
            .ok_or_else(|| EngineError::UnknownStep(step_id.to_string()))?;

        let handle = self.sessions.get_or_create(session_id).await;
        let mut session = handle.lock().await;

        // History appends before action validation: an unknown action still
        // leaves a record, preserving the full behavior log.
        session.record(step_id, action);

        if action == step.required_action {
            let complete = step.correct_next == TERMINAL_STEP;
            let next_step = if complete {
                None
            } else {
                self.scenario.step_by_id(&step.correct_next).cloned()
            };
            return Ok(Evaluation::Correct { next_step, complete });
        }

        let Some(wrong) = step.wrong_choices.iter().find(|w| w.action == action) else {
            return Err(EngineError::UnknownAction {
                step: step_id.to_string(),
                action: action.to_string(),
            });
        };

        match wrong.severity {
            Severity::Mistake => session.mistakes += 1,
            Severity::Warning => session.warnings += 1,
        }

        // Hint strictness keys off the count *after* this increment.
        let hint = hint::coach_hint(&self.coach, wrong, step, session.mistakes).await;

        Ok(Evaluation::Incorrect {
            consequence: wrong.consequence.clone(),
            severity: wrong.severity,
            hint,
            current_step: step.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::SCENARIO;
    use std::time::Duration;

    fn engine() -> Engine {
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(3600), 64));
        Engine::new(&SCENARIO, sessions, Arc::new(Coach::offline()))
    }

    #[tokio::test]
    async fn correct_action_advances_without_touching_counters() {
        let engine = engine();
        let result = engine.evaluate("s", "start", "wear_ppe").await.unwrap();

        match result {
            Evaluation::Correct { next_step, complete } => {
                assert!(!complete);
                assert_eq!(next_step.unwrap().id, "fill_burette");
            }
            other => panic!("expected Correct, got {:?}", other),
        }

        let session = engine.sessions().snapshot("s").await;
        assert_eq!(session.mistakes, 0);
        assert_eq!(session.warnings, 0);
        assert_eq!(session.actions.len(), 1);
    }

    #[tokio::test]
    async fn final_step_reports_complete_with_no_successor() {
        let engine = engine();
        let result = engine.evaluate("s", "record", "record_reading").await.unwrap();
        match result {
            Evaluation::Correct { next_step, complete } => {
                assert!(complete);
                assert!(next_step.is_none());
            }
            other => panic!("expected Correct, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn warning_holds_step_and_bumps_only_warnings() {
        let engine = engine();
        let result = engine.evaluate("s", "start", "skip_ppe").await.unwrap();

        match result {
            Evaluation::Incorrect {
                severity,
                current_step,
                hint,
                ..
            } => {
                assert_eq!(severity, Severity::Warning);
                assert_eq!(current_step.id, "start");
                assert!(!hint.text.is_empty());
            }
            other => panic!("expected Incorrect, got {:?}", other),
        }

        let session = engine.sessions().snapshot("s").await;
        assert_eq!(session.warnings, 1);
        assert_eq!(session.mistakes, 0);
    }

    #[tokio::test]
    async fn mistake_bumps_only_mistakes() {
        let engine = engine();
        engine
            .evaluate("s", "fill_burette", "fill_burette_naoh")
            .await
            .unwrap();

        let session = engine.sessions().snapshot("s").await;
        assert_eq!(session.mistakes, 1);
        assert_eq!(session.warnings, 0);
    }

    #[tokio::test]
    async fn replayed_mistake_compounds() {
        let engine = engine();
        for expected in 1..=2u32 {
            engine
                .evaluate("s", "fill_burette", "skip_fill")
                .await
                .unwrap();
            assert_eq!(engine.sessions().snapshot("s").await.mistakes, expected);
        }
    }

    #[tokio::test]
    async fn unknown_step_leaves_no_trace() {
        let engine = engine();
        let err = engine.evaluate("s", "no_such_step", "wear_ppe").await;
        assert!(matches!(err, Err(EngineError::UnknownStep(_))));
        assert!(engine.sessions().is_empty().await);
    }

    #[tokio::test]
    async fn unknown_action_records_history_but_no_counter() {
        let engine = engine();
        let err = engine.evaluate("s", "start", "dance").await;
        assert!(matches!(err, Err(EngineError::UnknownAction { .. })));

        let session = engine.sessions().snapshot("s").await;
        assert_eq!(session.actions.len(), 1);
        assert_eq!(session.actions[0].action, "dance");
        assert_eq!(session.mistakes, 0);
        assert_eq!(session.warnings, 0);
    }

    #[tokio::test]
    async fn warning_then_correct_action_walkthrough() {
        let engine = engine();

        let wrong = engine.evaluate("fresh", "start", "skip_ppe").await.unwrap();
        match wrong {
            Evaluation::Incorrect { severity, .. } => assert_eq!(severity, Severity::Warning),
            other => panic!("expected Incorrect, got {:?}", other),
        }
        assert_eq!(engine.sessions().snapshot("fresh").await.warnings, 1);

        let right = engine.evaluate("fresh", "start", "wear_ppe").await.unwrap();
        match right {
            Evaluation::Correct { next_step, complete } => {
                assert!(!complete);
                assert_eq!(next_step.unwrap().id, "fill_burette");
            }
            other => panic!("expected Correct, got {:?}", other),
        }
    }
}
