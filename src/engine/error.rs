// src/engine/error.rs

use thiserror::Error;

/// Request-level evaluation failures. Adapter failures are not here: the
/// coach boundary recovers those locally and they never reach a caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The referenced step id is not in the scenario graph. The session is
    /// untouched: the step cannot be resolved before any history append.
    #[error("Unknown step '{0}'")]
    UnknownStep(String),

    /// The action matches neither the step's required action nor any of its
    /// declared wrong choices. The history append has already happened.
    #[error("Unknown action '{action}' for step '{step}'")]
    UnknownAction { step: String, action: String },
}
