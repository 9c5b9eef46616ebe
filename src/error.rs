// Error taxonomy for one analysis run

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A GitHub request came back with a non-success status.
    #[error("GitHub API returned {status}: {body}")]
    Transport { status: u16, body: String },

    /// The request never produced a response (connect failure, timeout, bad body).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// File content that is not valid base64 or not UTF-8 text.
    #[error("could not decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("invalid repository URL `{0}`: expected https://<host>/<owner>/<repo>")]
    Parse(String),

    #[error("completion failed: {0}")]
    Completion(String),
}

impl AnalysisError {
    /// Errors that the content sampler skips over instead of aborting on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::Decode { .. } | AnalysisError::Transport { .. } | AnalysisError::Http(_)
        )
    }
}
