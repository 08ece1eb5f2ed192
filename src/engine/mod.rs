// src/engine/mod.rs

//! The scenario state machine and session-scoring engine: action
//! evaluation, hint escalation, and end-of-exercise debrief aggregation.

pub mod debrief;
pub mod error;
pub mod evaluate;
pub mod hint;

pub use debrief::Debrief;
pub use error::EngineError;
pub use evaluate::{Engine, Evaluation, CORRECT_MESSAGE};
pub use hint::{HintResult, HintTier};
