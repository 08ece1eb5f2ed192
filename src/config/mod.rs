// src/config/mod.rs
// All tunables load from the environment (.env supported), with defaults
// that run the simulation out of the box.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct LabConfig {
    // ── Server Configuration
    pub host: String,
    pub port: u16,

    // ── OpenAI Configuration
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,

    // ── Coach Settings
    pub coach_timeout_secs: u64,
    pub hint_max_tokens: u32,
    pub debrief_max_tokens: u32,

    // ── Session Store
    pub session_ttl_secs: u64,
    pub max_sessions: usize,

    // ── CORS Settings
    pub cors_origin: String,

    // ── Logging Configuration
    pub log_level: String,
}

/// Parse an env var, falling back to the default when missing or malformed.
/// Values may carry trailing comments (`PORT=5001 # dev`), which are stripped.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl LabConfig {
    pub fn from_env() -> Self {
        // Load .env first if present; real env vars still win.
        let _ = dotenvy::dotenv();

        Self {
            host: env_var_or("LABCOACH_HOST", "0.0.0.0".to_string()),
            port: env_var_or("LABCOACH_PORT", 5001),
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            openai_base_url: env_var_or(
                "OPENAI_BASE_URL",
                "https://api.openai.com/v1".to_string(),
            ),
            model: env_var_or("LABCOACH_MODEL", "gpt-4o-mini".to_string()),
            coach_timeout_secs: env_var_or("LABCOACH_COACH_TIMEOUT_SECS", 15),
            hint_max_tokens: env_var_or("LABCOACH_HINT_MAX_TOKENS", 120),
            debrief_max_tokens: env_var_or("LABCOACH_DEBRIEF_MAX_TOKENS", 200),
            session_ttl_secs: env_var_or("LABCOACH_SESSION_TTL_SECS", 1800),
            max_sessions: env_var_or("LABCOACH_MAX_SESSIONS", 1024),
            cors_origin: env_var_or("LABCOACH_CORS_ORIGIN", "*".to_string()),
            log_level: env_var_or("LABCOACH_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-call timeout for coach (text generation) requests
    pub fn coach_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.coach_timeout_secs)
    }

    /// True when a live OpenAI-compatible endpoint is configured
    pub fn coach_enabled(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<LabConfig> = Lazy::new(LabConfig::from_env);
