// src/engine/debrief.rs

//! End-of-exercise aggregation: terminal score, completion count, and the
//! personalised summary. Read-only over the session store — an unknown or
//! evicted session yields the zero-score debrief, never an error.

use serde::Serialize;

use crate::coach::PromptRequest;
use crate::session::ActionRecord;

use super::evaluate::Engine;

const MISTAKE_PENALTY: u32 = 15;
const WARNING_PENALTY: u32 = 5;

#[derive(Debug, Serialize)]
pub struct Debrief {
    pub score: u32,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub mistakes: u32,
    pub warnings: u32,
    pub summary: String,
    pub actions: Vec<ActionRecord>,
}

/// Score is clamped at zero and non-increasing in both counts.
fn score(mistakes: u32, warnings: u32) -> u32 {
    100u32
        .saturating_sub(mistakes.saturating_mul(MISTAKE_PENALTY))
        .saturating_sub(warnings.saturating_mul(WARNING_PENALTY))
}

impl Engine {
    pub async fn debrief(&self, session_id: &str) -> Debrief {
        let session = self.sessions().snapshot(session_id).await;
        let scenario = self.scenario();

        // An action counts as a completed step when it matches ANY step's
        // required action, not just the step it was recorded under. This
        // mirrors the reference scoring and is preserved deliberately.
        let completed_steps = session
            .actions
            .iter()
            .filter(|a| scenario.is_required_anywhere(&a.action))
            .count();

        let action_log =
            serde_json::to_string_pretty(&session.actions).unwrap_or_else(|_| "[]".to_string());

        let request = PromptRequest::Debrief {
            completed_steps,
            total_steps: scenario.total_steps(),
            mistakes: session.mistakes,
            warnings: session.warnings,
            action_log,
        };
        let summary = self.coach().generate(&request).await;

        Debrief {
            score: score(session.mistakes, session.warnings),
            completed_steps,
            total_steps: scenario.total_steps(),
            mistakes: session.mistakes,
            warnings: session.warnings,
            summary,
            actions: session.actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::Coach;
    use crate::scenario::SCENARIO;
    use crate::session::SessionStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn engine() -> Engine {
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(3600), 64));
        Engine::new(&SCENARIO, sessions, Arc::new(Coach::offline()))
    }

    #[test]
    fn score_penalizes_and_clamps() {
        assert_eq!(score(0, 0), 100);
        assert_eq!(score(1, 0), 85);
        assert_eq!(score(0, 1), 95);
        assert_eq!(score(2, 3), 55);
        assert_eq!(score(7, 0), 0);
        assert_eq!(score(100, 100), 0);
    }

    #[test]
    fn score_is_non_increasing_in_both_counts() {
        for m in 0..10 {
            for w in 0..10 {
                assert!(score(m + 1, w) <= score(m, w));
                assert!(score(m, w + 1) <= score(m, w));
            }
        }
    }

    #[tokio::test]
    async fn unknown_session_yields_zero_score_debrief() {
        let debrief = engine().debrief("never-seen").await;
        assert_eq!(debrief.score, 100);
        assert_eq!(debrief.completed_steps, 0);
        assert_eq!(debrief.mistakes, 0);
        assert_eq!(debrief.warnings, 0);
        assert!(debrief.actions.is_empty());
        assert!(!debrief.summary.is_empty());
    }

    #[tokio::test]
    async fn debrief_never_creates_a_session() {
        let engine = engine();
        engine.debrief("never-seen").await;
        assert!(engine.sessions().is_empty().await);
    }

    #[tokio::test]
    async fn completed_counts_actions_matching_any_required_action() {
        let engine = engine();
        // "record_reading" submitted against the wrong step still counts:
        // it is the required action of SOME step in the graph.
        engine.evaluate("s", "start", "wear_ppe").await.unwrap();
        let _ = engine.evaluate("s", "fill_burette", "record_reading").await;

        let debrief = engine.debrief("s").await;
        assert_eq!(debrief.completed_steps, 2);
    }

    #[tokio::test]
    async fn counts_flow_through_to_the_debrief() {
        let engine = engine();
        engine.evaluate("s", "start", "skip_ppe").await.unwrap();
        engine
            .evaluate("s", "fill_burette", "fill_burette_naoh")
            .await
            .unwrap();
        engine.evaluate("s", "start", "wear_ppe").await.unwrap();

        let debrief = engine.debrief("s").await;
        assert_eq!(debrief.mistakes, 1);
        assert_eq!(debrief.warnings, 1);
        assert_eq!(debrief.score, 80);
        assert_eq!(debrief.completed_steps, 1);
        assert_eq!(debrief.total_steps, 5);
        assert_eq!(debrief.actions.len(), 3);
    }
}
