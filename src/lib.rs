// src/lib.rs

pub mod api;
pub mod coach;
pub mod config;
pub mod engine;
pub mod scenario;
pub mod session;
pub mod state;
