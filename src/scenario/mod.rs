// src/scenario/mod.rs

pub mod graph;

pub use graph::{Scenario, ScenarioError, Severity, Step, WrongChoice, SCENARIO, TERMINAL_STEP};
