// src/coach/mod.rs

//! Text-generation boundary. The engine talks to a capability interface
//! (`TextGenerator`) implemented by two strategies: a live OpenAI-compatible
//! client and a deterministic fallback. Failures of the live strategy are
//! recovered locally and never surface to a request.

pub mod fallback;
pub mod openai;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub use fallback::FallbackCoach;
pub use openai::OpenAiCoach;

/// Structured prompt input for one generation call. Carries everything a
/// strategy needs; the fallback strategy renders deterministic text from the
/// same fields the live strategy prompts with.
#[derive(Debug, Clone)]
pub enum PromptRequest {
    Hint {
        hint_tag: String,
        context: String,
        step_description: String,
        mistake_count: u32,
        style: String,
    },
    Debrief {
        completed_steps: usize,
        total_steps: usize,
        mistakes: u32,
        warnings: u32,
        action_log: String,
    },
}

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("coach request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("coach endpoint returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("coach response had no message content")]
    MalformedResponse,
    #[error("coach request timed out after {0}s")]
    Timeout(u64),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, req: &PromptRequest) -> Result<String, CoachError>;
}

/// Composes the two strategies: try the live endpoint when one is
/// configured, route any failure to the deterministic fallback.
pub struct Coach {
    live: Option<Arc<dyn TextGenerator>>,
    fallback: FallbackCoach,
}

impl Coach {
    pub fn new(live: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            live,
            fallback: FallbackCoach,
        }
    }

    /// Fallback-only coach; every request renders the fixed text.
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Never fails: live strategy errors degrade to the fixed fallback text.
    pub async fn generate(&self, req: &PromptRequest) -> String {
        if let Some(live) = &self.live {
            match live.generate(req).await {
                Ok(text) => return text,
                Err(e) => debug!("coach generation failed, using fallback: {}", e),
            }
        }
        self.fallback.render(req)
    }
}
