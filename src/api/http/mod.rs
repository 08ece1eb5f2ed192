// src/api/http/mod.rs

pub mod handlers;
pub mod router;
pub mod types;

pub use router::app_router;
