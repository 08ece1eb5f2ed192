// src/state.rs

use std::sync::Arc;
use std::time::Duration;

use crate::coach::{Coach, OpenAiCoach};
use crate::config::CONFIG;
use crate::engine::Engine;
use crate::scenario::SCENARIO;
use crate::session::SessionStore;

/// Shared application state handed to every handler.
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// Assemble the engine over the bundled scenario: session store sized from
/// config, live coach only when an API key is configured.
pub fn create_app_state() -> AppState {
    let sessions = Arc::new(SessionStore::new(
        Duration::from_secs(CONFIG.session_ttl_secs),
        CONFIG.max_sessions,
    ));

    let live = OpenAiCoach::from_config(&CONFIG)
        .map(|coach| Arc::new(coach) as Arc<dyn crate::coach::TextGenerator>);
    let coach = Arc::new(Coach::new(live));

    AppState {
        engine: Arc::new(Engine::new(&SCENARIO, sessions, coach)),
    }
}
