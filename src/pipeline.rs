// Pipeline orchestrator: fetch, assemble, complete, sanitize

use chrono::Utc;
use log::{error, info};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::{AnalysisContext, Config};
use crate::error::AnalysisError;
use crate::github::{GitHubClient, RepositoryReference};
use crate::llm::client::{ChatCompletionClient, Completer};
use crate::llm::prompts::assemble_prompt;
use crate::report::{RunStamp, error_report};
use crate::sampler::{render_content_block, sample_contents};
use crate::sanitize::sanitize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Assembling,
    Completing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Assembling => "assembling",
            Stage::Completing => "completing",
        };
        f.write_str(name)
    }
}

/// Where a failed run stopped, and why.
#[derive(Debug)]
pub struct RunFailure {
    pub stage: Stage,
    pub error: AnalysisError,
}

impl RunFailure {
    fn at(stage: Stage) -> impl FnOnce(AnalysisError) -> Self {
        move |error| RunFailure { stage, error }
    }

    /// Message shown in the error report.
    pub fn message(&self) -> String {
        match self.stage {
            Stage::Fetching => format!("Failed to analyze repository: {}", self.error),
            _ => self.error.to_string(),
        }
    }
}

/// Three text blocks pulled from a repository.
#[derive(Clone, Debug)]
pub struct RepoSnapshot {
    pub summary: String,
    pub tree: String,
    pub content: String,
}

/// Stateless README generator. Cheap to clone; runs never share state.
#[derive(Clone)]
pub struct ReadmeGenerator {
    github: GitHubClient,
    completer: Arc<dyn Completer>,
    concurrency: usize,
    provenance_log: Option<String>,
}

impl ReadmeGenerator {
    pub fn new(config: &Config) -> Result<Self, AnalysisError> {
        let completer = ChatCompletionClient::new(config)?;
        Self::with_completer(config, Arc::new(completer))
    }

    /// Same as [`ReadmeGenerator::new`] with a caller-provided completion backend.
    pub fn with_completer(
        config: &Config,
        completer: Arc<dyn Completer>,
    ) -> Result<Self, AnalysisError> {
        Ok(ReadmeGenerator {
            github: GitHubClient::new(config)?,
            completer,
            concurrency: config.concurrency,
            provenance_log: config.provenance_log.clone(),
        })
    }

    /// Pulls metadata, tree and sampled contents for `repo`.
    pub async fn snapshot(&self, repo: &RepositoryReference) -> Result<RepoSnapshot, AnalysisError> {
        let metadata = self.github.fetch_metadata(repo).await?;
        let branch = metadata.default_branch();

        let listing = self.github.fetch_tree(repo, branch).await?;
        let excerpts =
            sample_contents(&self.github, repo, branch, &listing, self.concurrency).await?;

        Ok(RepoSnapshot {
            summary: metadata.summary(),
            tree: listing.render(),
            content: render_content_block(&excerpts),
        })
    }

    /// Runs every stage. The `Err` side carries the stage that failed.
    pub async fn run(&self, repo_url: &str, stamp: &RunStamp) -> Result<String, RunFailure> {
        info!("[{}] Starting analysis for {}", Stage::Fetching, repo_url);
        let repo = RepositoryReference::parse(repo_url).map_err(RunFailure::at(Stage::Fetching))?;
        let snapshot = self
            .snapshot(&repo)
            .await
            .map_err(RunFailure::at(Stage::Fetching))?;

        info!("[{}] Building prompt for {}", Stage::Assembling, repo);
        let prompt = assemble_prompt(
            repo_url,
            &snapshot.summary,
            &snapshot.tree,
            &snapshot.content,
        );

        info!(
            "[{}] Sending {} byte prompt for {}",
            Stage::Completing,
            prompt.len(),
            repo
        );
        let generated = self
            .completer
            .complete(&prompt)
            .await
            .map_err(RunFailure::at(Stage::Completing))?;

        let readme = sanitize(&generated);
        if readme.is_empty() {
            return Err(RunFailure {
                stage: Stage::Completing,
                error: AnalysisError::Completion("response contained no text".to_string()),
            });
        }

        Ok(format!("{}{}", readme, stamp.footer()))
    }

    /// Generates a README for `repo_url`. Always returns Markdown: the README
    /// on success, the error report otherwise.
    pub async fn analyze(&self, repo_url: &str, context: &AnalysisContext) -> String {
        if !context.is_empty() {
            info!(
                "Ignoring {} unrecognized context option(s)",
                context.options.len()
            );
        }

        let stamp = RunStamp::from_log(self.provenance_log.as_deref().unwrap_or(""), Utc::now());
        info!("Run stamped {} for {}", stamp.date, stamp.login);

        match self.run(repo_url, &stamp).await {
            Ok(readme) => {
                info!("✅ README generated for {}", repo_url);
                readme
            }
            Err(failure) => {
                error!(
                    "❌ Analysis error while {}: {}",
                    failure.stage, failure.error
                );
                error_report(&failure.message(), &stamp)
            }
        }
    }

    /// Runs [`ReadmeGenerator::analyze`] on its own tokio task.
    pub fn spawn(&self, repo_url: String, context: AnalysisContext) -> JoinHandle<String> {
        let generator = self.clone();
        tokio::spawn(async move { generator.analyze(&repo_url, &context).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MockCompleter;

    fn generator_with(completer: MockCompleter) -> ReadmeGenerator {
        let config = Config {
            // Nothing listens here; these tests never reach GitHub.
            github_api_base: "http://127.0.0.1:9".to_string(),
            provenance_log: Some(
                "Current Date and Time (UTC - YYYY-MM-DD HH:MM:SS formatted): 2025-02-02 10:45:04"
                    .to_string(),
            ),
            ..Config::default()
        };
        ReadmeGenerator::with_completer(&config, Arc::new(completer)).unwrap()
    }

    #[tokio::test]
    async fn bad_url_fails_before_any_request() {
        let mut completer = MockCompleter::new();
        completer.expect_complete().never();

        let report = generator_with(completer)
            .analyze("https://github.com/alice", &AnalysisContext::new())
            .await;

        assert!(report.starts_with("# Repository Analysis Error"));
        assert!(report.contains("invalid repository URL `https://github.com/alice`"));
        assert!(report.ends_with("*Generated by GH-Readme-Bot on 2025-02-02 10:45:04 UTC*"));
    }

    #[tokio::test]
    async fn unreachable_github_yields_error_report() {
        let mut completer = MockCompleter::new();
        completer.expect_complete().never();

        let failure = generator_with(completer)
            .run("https://github.com/alice/demo", &RunStamp::from_log("", Utc::now()))
            .await
            .unwrap_err();

        assert_eq!(failure.stage, Stage::Fetching);
        assert!(matches!(failure.error, AnalysisError::Http(_)));
        assert!(failure.message().starts_with("Failed to analyze repository: "));
    }

    #[test]
    fn analysis_future_can_run_on_a_worker_task() {
        fn assert_send<T: Send>(_: &T) {}

        let generator = generator_with(MockCompleter::new());
        let context = AnalysisContext::new();
        let future = generator.analyze("https://github.com/alice", &context);
        assert_send(&future);
        drop(future);
    }

    #[tokio::test]
    async fn reasoning_only_completion_is_a_failure() {
        use serde_json::json;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/demo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "demo" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/demo/git/trees/main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tree": [] })))
            .mount(&server)
            .await;

        let mut completer = MockCompleter::new();
        completer
            .expect_complete()
            .times(1)
            .returning(|_| Ok("<think>only reasoning, no readme</think>\n".to_string()));
        let config = Config {
            github_api_base: server.uri(),
            ..Config::default()
        };
        let generator = ReadmeGenerator::with_completer(&config, Arc::new(completer)).unwrap();

        let failure = generator
            .run("https://github.com/alice/demo", &RunStamp::from_log("", Utc::now()))
            .await
            .unwrap_err();
        assert_eq!(failure.stage, Stage::Completing);
        assert_eq!(
            failure.message(),
            "completion failed: response contained no text"
        );
    }

    #[test]
    fn completion_failures_are_reported_verbatim() {
        let failure = RunFailure {
            stage: Stage::Completing,
            error: AnalysisError::Completion("operation timed out".to_string()),
        };
        assert_eq!(failure.message(), "completion failed: operation timed out");
    }
}
