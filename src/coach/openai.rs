// src/coach/openai.rs

//! Live strategy: chat-completions calls against an OpenAI-compatible
//! endpoint. No SDK wrappers; just reqwest and serde_json.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::LabConfig;

use super::{CoachError, PromptRequest, TextGenerator};

const HINT_SYSTEM_PROMPT: &str = "You are a supportive chemistry lab coach for students learning titration. \
     You are encouraging, never condescending. Keep responses under 2 sentences. \
     Never repeat the consequence they already saw.";

const DEBRIEF_SYSTEM_PROMPT: &str = "You are a chemistry lab instructor writing a personalised end-of-session debrief. \
     Be encouraging but honest. Focus on process, not just outcome. \
     Keep the total response under 4 sentences.";

pub struct OpenAiCoach {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    timeout: Duration,
    hint_max_tokens: u32,
    debrief_max_tokens: u32,
}

impl OpenAiCoach {
    /// `None` when no API key is configured; the caller then runs
    /// fallback-only.
    pub fn from_config(config: &LabConfig) -> Option<Self> {
        let api_key = config.openai_api_key.clone()?;
        Some(Self {
            client: Client::new(),
            api_key,
            api_base: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: config.coach_timeout(),
            hint_max_tokens: config.hint_max_tokens,
            debrief_max_tokens: config.debrief_max_tokens,
        })
    }

    fn build_payload(&self, req: &PromptRequest) -> Value {
        let (system, user, max_tokens) = match req {
            PromptRequest::Hint {
                context,
                step_description,
                mistake_count,
                style,
                ..
            } => (
                HINT_SYSTEM_PROMPT,
                format!(
                    "Situation: {context}\n\
                     Current step: {step_description}\n\
                     Mistakes so far this session: {mistake_count}\n\
                     Style instruction: {style}\n\n\
                     Give the hint text only, no preamble."
                ),
                self.hint_max_tokens,
            ),
            PromptRequest::Debrief {
                completed_steps,
                total_steps,
                mistakes,
                warnings,
                action_log,
            } => (
                DEBRIEF_SYSTEM_PROMPT,
                format!(
                    "Student completed an acid-base titration simulation.\n\
                     Steps completed correctly: {completed_steps}/{total_steps}\n\
                     Critical mistakes: {mistakes}\n\
                     Minor warnings: {warnings}\n\
                     Action log: {action_log}\n\n\
                     Write a personalised debrief that acknowledges what they did well, \
                     identifies the main area to improve, and ends with encouragement."
                ),
                self.debrief_max_tokens,
            ),
        };

        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "max_tokens": max_tokens,
            "temperature": 0.7
        })
    }

    async fn chat(&self, payload: &Value) -> Result<String, CoachError> {
        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CoachError::Api { status, body });
        }

        let body: Value = response.json().await?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(CoachError::MalformedResponse)?;
        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl TextGenerator for OpenAiCoach {
    async fn generate(&self, req: &PromptRequest) -> Result<String, CoachError> {
        let payload = self.build_payload(req);
        match tokio::time::timeout(self.timeout, self.chat(&payload)).await {
            Ok(result) => result,
            Err(_) => Err(CoachError::Timeout(self.timeout.as_secs())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coach() -> OpenAiCoach {
        OpenAiCoach {
            client: Client::new(),
            api_key: "test-key".to_string(),
            api_base: "http://localhost:9".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_millis(250),
            hint_max_tokens: 120,
            debrief_max_tokens: 200,
        }
    }

    #[test]
    fn hint_payload_carries_style_and_context() {
        let req = PromptRequest::Hint {
            hint_tag: "safety_ppe".to_string(),
            context: "The student skipped putting on PPE before handling acid.".to_string(),
            step_description: "Put on PPE.".to_string(),
            mistake_count: 2,
            style: "Give a brief procedural hint".to_string(),
        };
        let payload = coach().build_payload(&req);

        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["max_tokens"], 120);
        let user = payload["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("Situation: The student skipped"));
        assert!(user.contains("Mistakes so far this session: 2"));
        assert!(user.contains("Style instruction: Give a brief procedural hint"));
    }

    #[test]
    fn debrief_payload_uses_debrief_token_limit() {
        let req = PromptRequest::Debrief {
            completed_steps: 4,
            total_steps: 5,
            mistakes: 1,
            warnings: 0,
            action_log: "[]".to_string(),
        };
        let payload = coach().build_payload(&req);

        assert_eq!(payload["max_tokens"], 200);
        let user = payload["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("Steps completed correctly: 4/5"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error_not_a_panic() {
        let req = PromptRequest::Debrief {
            completed_steps: 0,
            total_steps: 5,
            mistakes: 0,
            warnings: 0,
            action_log: "[]".to_string(),
        };
        let result = coach().generate(&req).await;
        assert!(result.is_err());
    }
}
