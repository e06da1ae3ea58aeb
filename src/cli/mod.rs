//! Command-line surface: step inputs and workflow orchestration

pub mod args;
pub mod orchestration;

pub use args::Args;
pub use orchestration::{report, Mode, ReleaseOrchestrator, RunOutcome, WorkflowArgs};
