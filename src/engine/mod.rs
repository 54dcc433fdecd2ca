// src/engine/mod.rs

//! Session and scoring engine.
//!
//! Runs one interactive attempt per mounted instance, scores it against the
//! bank and hands a finished payload to the submission transport.

pub mod client;
pub mod export;
pub mod instance;
pub mod registry;
pub mod scoring;
pub mod session;
pub mod sheet;

/// Version tag sent with every submission.
pub const PAYLOAD_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("choose an option to continue")]
    SelectionRequired,
    #[error("the attempt is complete; reset to start again")]
    Locked,
    #[error("option {0} is not on this question")]
    InvalidOption(usize),
    #[error("the attempt is not complete yet")]
    NotComplete,
    #[error("this assessment was removed from the page")]
    Removed,
}
