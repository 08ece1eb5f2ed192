// src/engine/hint.rs

//! Hint policy: maps a session's accumulated mistake count to a coaching
//! strictness tier and assembles the generation request for the coach
//! boundary. The tier depends only on mistakes, never warnings — warnings
//! are recoverable, repeated mistakes signal deeper confusion.

use crate::coach::{Coach, PromptRequest};
use crate::scenario::{Step, WrongChoice};

/// Coaching strictness, escalating with accumulated mistakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HintTier {
    /// A single guiding question, never revealing the answer.
    Socratic,
    /// Points toward the correct action without stating it.
    Procedural,
    /// A clear explanation of the correct action and why.
    Direct,
}

impl HintTier {
    /// Pure step function of the post-increment mistake count.
    /// Thresholds at 2 and 4; monotonic since counts only increase.
    pub fn for_mistakes(mistake_count: u32) -> Self {
        match mistake_count {
            0..=1 => HintTier::Socratic,
            2..=3 => HintTier::Procedural,
            _ => HintTier::Direct,
        }
    }

    pub fn style_instruction(&self) -> &'static str {
        match self {
            HintTier::Socratic => {
                "Ask a single Socratic question that guides them to discover the issue themselves. \
                 Do not reveal the answer."
            }
            HintTier::Procedural => {
                "Give a brief procedural hint that points toward the correct action without fully \
                 revealing it."
            }
            HintTier::Direct => {
                "Give a clear, direct explanation of what they should do and why, since they have \
                 struggled multiple times."
            }
        }
    }
}

/// Situational context fed to the coach for each hint tag. Tags missing here
/// still get a hint via the generic line.
pub fn tag_context(hint_tag: &str) -> &'static str {
    match hint_tag {
        "safety_ppe" => "The student skipped putting on PPE before handling acid.",
        "wrong_reagent" => "The student put the wrong reagent (NaOH) in the burette instead of HCl.",
        "missing_step" => "The student tried to proceed without filling the burette.",
        "suboptimal_indicator" => {
            "The student chose litmus instead of phenolphthalein for an acid-base titration."
        }
        "missing_indicator" => "The student skipped adding an indicator to the flask.",
        "overtitration" => "The student added too much HCl and went past the endpoint.",
        "titration_speed" => "The student added the titrant too quickly near the endpoint.",
        "missing_record" => {
            "The student forgot to record the burette reading after reaching the endpoint."
        }
        _ => "The student made an error.",
    }
}

/// Coaching text plus a human-readable reason naming the triggering category.
#[derive(Debug, Clone)]
pub struct HintResult {
    pub text: String,
    pub reason: String,
}

/// Generate a hint for a wrong choice. `mistake_count` is the session count
/// after the current increment. The reason string is produced the same way
/// whether the live coach or the fallback supplied the text.
pub async fn coach_hint(
    coach: &Coach,
    wrong: &WrongChoice,
    step: &Step,
    mistake_count: u32,
) -> HintResult {
    let context = tag_context(&wrong.hint_tag);
    let tier = HintTier::for_mistakes(mistake_count);

    let request = PromptRequest::Hint {
        hint_tag: wrong.hint_tag.clone(),
        context: context.to_string(),
        step_description: step.description.clone(),
        mistake_count,
        style: tier.style_instruction().to_string(),
    };
    let text = coach.generate(&request).await;

    HintResult {
        text,
        reason: format!("This hint was given because: {}", context.to_lowercase()),
    }
}
