pub mod bootstrap;
pub mod submission;
