// src/models/mod.rs

pub mod attempt;
pub mod caller;
pub mod client_config;
pub mod payload;
