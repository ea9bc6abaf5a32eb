//! Prompt optimization pipeline
//!
//! Runs three dependent completion calls (analyze, enrich context, generate
//! optimized prompt) and returns the final prompt with the intermediate
//! outputs.

mod pipeline;
mod stages;

pub use pipeline::{Pipeline, PipelineError, PipelineResult, is_blank_problem};
pub use promptforge_config::StageFailurePolicy;
pub use stages::Stage;
