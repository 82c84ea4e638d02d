// ABOUTME: Hosted-model integration for NAPE
// ABOUTME: Prompt assembly, generate-content client, and reply parsing

pub mod prompts;
pub mod service;

pub use service::{AnalysisError, AnalysisService};
