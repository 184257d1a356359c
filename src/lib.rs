//! # mindscan
//!
//! A terminal client for a mental-health text classification service.
//!
//! ## Features
//!
//! - **One contract**: `POST <base-url>/analyze` with `{ "text": ... }`, typed `AnalysisResponse` back
//! - **Two views**: a submission view and a results view, driven by one `Session` state machine
//! - **Three front ends**: ratatui TUI, one-shot CLI, and a line-oriented chat

pub mod analysis;
pub mod chat;
pub mod client;
pub mod config;
pub mod logging;
pub mod render;
pub mod session;
pub mod ui;

pub use analysis::{AnalysisResponse, SimilarStatement};
pub use client::{AnalysisClient, AnalysisError, Analyzer};
pub use config::Config;
pub use render::Report;
pub use session::{Session, Transition};
