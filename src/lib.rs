//! gh-readme-bot: writes a README for a GitHub repository.
//!
//! The repository's metadata, file tree and the first part of every text file
//! are folded into one prompt for an LLM. Its answer, cleaned up, is the README.

pub mod config;
pub mod error;
pub mod github;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod sampler;
pub mod sanitize;

pub use config::{AnalysisContext, Config};
pub use error::AnalysisError;
pub use github::RepositoryReference;
pub use pipeline::ReadmeGenerator;
pub use sanitize::sanitize;
