// src/scenario/graph.rs

//! The scenario graph: an ordered chain of required steps, each with one
//! correct successor and zero or more classified wrong alternatives.
//! Built once at start-up and read-only for the life of the process.

use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

/// Sentinel successor id marking the end of the chain.
pub const TERMINAL_STEP: &str = "complete";

/// How badly a wrong choice deviates from the procedure.
/// Warnings are recoverable; mistakes drive the hint escalation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Mistake,
}

/// A classified deviation from a step's required action.
#[derive(Debug, Clone, Serialize)]
pub struct WrongChoice {
    pub action: String,
    pub consequence: String,
    pub hint_tag: String,
    pub severity: Severity,
}

/// One required step in the procedure chain.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub id: String,
    pub description: String,
    pub required_action: String,
    pub correct_next: String,
    pub wrong_choices: Vec<WrongChoice>,
}

/// The full procedure: metadata plus the ordered step chain.
/// Branching exists only in wrong paths; the correct path is a single chain.
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub title: String,
    pub description: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario has no steps")]
    Empty,
    #[error("duplicate step id '{0}'")]
    DuplicateStep(String),
    #[error("step '{step}' links to unknown successor '{next}'")]
    DanglingNext { step: String, next: String },
    #[error("step '{step}' lists its required action '{action}' as a wrong choice")]
    RequiredActionConflict { step: String, action: String },
    #[error("step '{step}' declares wrong choice '{action}' more than once")]
    DuplicateWrongChoice { step: String, action: String },
}

impl Scenario {
    /// The step at chain position 0.
    pub fn first_step(&self) -> &Step {
        &self.steps[0]
    }

    pub fn step_by_id(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// True when some step anywhere in the chain requires this action.
    /// The debrief counts completed steps against the whole graph, not the
    /// step an action was recorded under.
    pub fn is_required_anywhere(&self, action: &str) -> bool {
        self.steps.iter().any(|s| s.required_action == action)
    }

    /// Structural checks, run once before the server binds:
    /// - at least one step, unique ids
    /// - every `correct_next` resolves to a step or the terminal sentinel
    /// - a step's required action never doubles as one of its wrong choices
    /// - wrong-choice actions are unique within their step
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.steps.is_empty() {
            return Err(ScenarioError::Empty);
        }
        for (i, step) in self.steps.iter().enumerate() {
            if self.steps[..i].iter().any(|s| s.id == step.id) {
                return Err(ScenarioError::DuplicateStep(step.id.clone()));
            }
            if step.correct_next != TERMINAL_STEP && self.step_by_id(&step.correct_next).is_none() {
                return Err(ScenarioError::DanglingNext {
                    step: step.id.clone(),
                    next: step.correct_next.clone(),
                });
            }
            for (j, wrong) in step.wrong_choices.iter().enumerate() {
                if wrong.action == step.required_action {
                    return Err(ScenarioError::RequiredActionConflict {
                        step: step.id.clone(),
                        action: wrong.action.clone(),
                    });
                }
                if step.wrong_choices[..j].iter().any(|w| w.action == wrong.action) {
                    return Err(ScenarioError::DuplicateWrongChoice {
                        step: step.id.clone(),
                        action: wrong.action.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn step(
    id: &str,
    description: &str,
    required_action: &str,
    correct_next: &str,
    wrong_choices: Vec<WrongChoice>,
) -> Step {
    Step {
        id: id.to_string(),
        description: description.to_string(),
        required_action: required_action.to_string(),
        correct_next: correct_next.to_string(),
        wrong_choices,
    }
}

fn wrong(action: &str, consequence: &str, hint_tag: &str, severity: Severity) -> WrongChoice {
    WrongChoice {
        action: action.to_string(),
        consequence: consequence.to_string(),
        hint_tag: hint_tag.to_string(),
        severity,
    }
}

/// The bundled acid-base titration procedure. Immutable after construction.
pub static SCENARIO: Lazy<Scenario> = Lazy::new(|| Scenario {
    title: "Acid-Base Titration".to_string(),
    description: "Determine the concentration of an unknown base using hydrochloric acid."
        .to_string(),
    steps: vec![
        step(
            "start",
            "You are at the lab bench. Begin by putting on your personal protective equipment.",
            "wear_ppe",
            "fill_burette",
            vec![wrong(
                "skip_ppe",
                "⚠️ Acid splashes on your hand — always wear gloves and goggles first!",
                "safety_ppe",
                Severity::Warning,
            )],
        ),
        step(
            "fill_burette",
            "PPE on ✓. Now fill the burette with the HCl solution (0.1 M).",
            "fill_burette_hcl",
            "add_indicator",
            vec![
                wrong(
                    "fill_burette_naoh",
                    "❌ You filled the burette with NaOH — the titrant should be the acid (HCl).",
                    "wrong_reagent",
                    Severity::Mistake,
                ),
                wrong(
                    "skip_fill",
                    "❌ The burette is empty. You can't titrate without a titrant!",
                    "missing_step",
                    Severity::Mistake,
                ),
            ],
        ),
        step(
            "add_indicator",
            "Burette filled ✓. Add 3 drops of phenolphthalein indicator to the flask of NaOH.",
            "add_phenolphthalein",
            "titrate",
            vec![
                wrong(
                    "add_litmus",
                    "⚠️ Litmus works, but phenolphthalein gives a sharper endpoint for this titration.",
                    "suboptimal_indicator",
                    Severity::Warning,
                ),
                wrong(
                    "skip_indicator",
                    "❌ Without an indicator you won't see the endpoint. Add indicator first.",
                    "missing_indicator",
                    Severity::Mistake,
                ),
            ],
        ),
        step(
            "titrate",
            "Flask is pink ✓. Slowly add HCl from the burette until the pink colour just disappears (endpoint).",
            "titrate_correct",
            "record",
            vec![
                wrong(
                    "overtitrate",
                    "❌ You went past the endpoint — the solution is now colourless AND acidic. Start over.",
                    "overtitration",
                    Severity::Mistake,
                ),
                wrong(
                    "titrate_fast",
                    "⚠️ Adding too fast makes it hard to catch the exact endpoint. Slow down near the end.",
                    "titration_speed",
                    Severity::Warning,
                ),
            ],
        ),
        step(
            "record",
            "Endpoint reached ✓. Record the final burette reading.",
            "record_reading",
            TERMINAL_STEP,
            vec![wrong(
                "skip_record",
                "❌ You forgot to record the burette reading — your result is lost!",
                "missing_record",
                Severity::Mistake,
            )],
        ),
    ],
});
