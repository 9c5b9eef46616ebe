// Runtime configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_COMPLETION_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Settings shared by every run of a [`crate::ReadmeGenerator`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub REST API root, without trailing slash
    pub github_api_base: String,
    /// Sent as a bearer token when present
    pub github_token: Option<String>,
    /// OpenAI-compatible API root; `/chat/completions` is appended
    pub completion_api_base: String,
    pub completion_api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
    /// Content fetches in flight at once. 1 keeps sampling strictly sequential.
    pub concurrency: usize,
    /// Applied to every HTTP request; `None` waits forever
    pub timeout: Option<Duration>,
    /// Log text scanned for the date and login used in the footer
    pub provenance_log: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            github_api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            github_token: None,
            completion_api_base: DEFAULT_COMPLETION_API_BASE.to_string(),
            completion_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 4000,
            concurrency: 1,
            timeout: None,
            provenance_log: None,
        }
    }
}

/// Caller-supplied options for a single run.
///
/// No key is recognized yet. The map is carried through so callers can start
/// sending options before the pipeline reads them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    #[serde(flatten)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
