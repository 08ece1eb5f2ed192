// src/coach/fallback.rs

//! Deterministic fallback strategy: fixed, pre-written coaching text keyed by
//! hint tag (hints) or interpolating the numeric counts (debriefs). Used
//! whenever the live endpoint is unconfigured, errors, or times out.

use async_trait::async_trait;

use super::{CoachError, PromptRequest, TextGenerator};

/// One fixed guiding question per hint tag; unknown tags get the generic line.
fn fallback_hint(hint_tag: &str) -> &'static str {
    match hint_tag {
        "safety_ppe" => "What should you always do before handling any chemical?",
        "wrong_reagent" => {
            "Which chemical should go in the burette — the one with known or unknown concentration?"
        }
        "missing_step" => "What needs to be in the burette before you can start adding to the flask?",
        "suboptimal_indicator" => {
            "What colour change would tell you most clearly that you've reached the endpoint?"
        }
        "missing_indicator" => {
            "How will you know when to stop adding acid if you can't see a colour change?"
        }
        "overtitration" => {
            "Try adding drops one at a time and swirling — what are you looking for to stop?"
        }
        "titration_speed" => "Near the endpoint, why might it help to add the titrant drop by drop?",
        "missing_record" => {
            "What data do you need to calculate the concentration of the unknown solution?"
        }
        _ => "Think carefully about the correct procedure for this step.",
    }
}

pub struct FallbackCoach;

impl FallbackCoach {
    /// Infallible rendering; the trait impl just wraps this in `Ok`.
    pub fn render(&self, req: &PromptRequest) -> String {
        match req {
            PromptRequest::Hint { hint_tag, .. } => fallback_hint(hint_tag).to_string(),
            PromptRequest::Debrief {
                completed_steps,
                total_steps,
                mistakes,
                warnings,
                ..
            } => format!(
                "You completed {} of {} steps correctly. \
                 You made {} critical mistake(s) and received {} warning(s). \
                 Review the safety and measurement steps and try again — you're making progress!",
                completed_steps, total_steps, mistakes, warnings
            ),
        }
    }
}

#[async_trait]
impl TextGenerator for FallbackCoach {
    async fn generate(&self, req: &PromptRequest) -> Result<String, CoachError> {
        Ok(self.render(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bundled_tag_has_a_specific_fallback() {
        let generic = fallback_hint("nope");
        for tag in [
            "safety_ppe",
            "wrong_reagent",
            "missing_step",
            "suboptimal_indicator",
            "missing_indicator",
            "overtitration",
            "titration_speed",
            "missing_record",
        ] {
            assert_ne!(fallback_hint(tag), generic, "tag '{}' fell through", tag);
        }
    }

    #[test]
    fn debrief_fallback_interpolates_counts() {
        let req = PromptRequest::Debrief {
            completed_steps: 3,
            total_steps: 5,
            mistakes: 2,
            warnings: 1,
            action_log: String::new(),
        };
        let text = FallbackCoach.render(&req);
        assert!(text.contains("3 of 5"));
        assert!(text.contains("2 critical mistake(s)"));
        assert!(text.contains("1 warning(s)"));
    }
}
