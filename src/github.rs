// GitHub REST client: repository metadata, recursive tree, file contents

use log::{error, info, warn};
use reqwest::{self, Url, header};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::llm::schemas::github_response::{
    EntryKind, GitHubContent, GitHubTree, RepoMetadata, TreeEntry,
};

/// Extensions that are never sampled for content.
pub const BINARY_EXTENSIONS: [&str; 25] = [
    ".png", ".jpg", ".jpeg", ".gif", ".ico", ".pdf", ".zip", ".tar", ".gz", ".rar", ".7z", ".exe",
    ".dll", ".so", ".dylib", ".class", ".pyc", ".pyo", ".pyd", ".db", ".sqlite", ".sqlite3", ".bin",
    ".dat", ".iso",
];

/// Matched as substrings anywhere in the path, not only as a prefix.
pub const EXCLUDED_PATHS: [&str; 10] = [
    ".git/",
    ".github/workflows/",
    "node_modules/",
    "venv/",
    "env/",
    "__pycache__/",
    "dist/",
    "build/",
    "coverage/",
    ".pytest_cache/",
];

/// `owner/name` pair parsed out of a repository URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryReference {
    pub owner: String,
    pub name: String,
}

impl RepositoryReference {
    /// Accepts `https://<host>/<owner>/<repo>` with any number of trailing slashes.
    pub fn parse(repo_url: &str) -> Result<Self, AnalysisError> {
        let invalid = || AnalysisError::Parse(repo_url.to_string());

        let url = Url::parse(repo_url.trim().trim_end_matches('/')).map_err(|_| invalid())?;
        if url.host_str().is_none() {
            return Err(invalid());
        }

        let segments: Vec<&str> = url.path_segments().ok_or_else(invalid)?.collect();
        match segments.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(RepositoryReference {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl TreeEntry {
    /// Blob whose path passes both the binary-extension and excluded-directory filters.
    pub fn is_candidate(&self) -> bool {
        self.kind == EntryKind::Blob
            && !BINARY_EXTENSIONS.iter().any(|ext| self.path.ends_with(ext))
            && !EXCLUDED_PATHS.iter().any(|excl| self.path.contains(excl))
    }
}

/// Result of one recursive tree listing.
#[derive(Clone, Debug)]
pub struct TreeListing {
    pub entries: Vec<TreeEntry>,
}

impl TreeListing {
    /// `File Structure:` header plus one `- <path>` line per entry, in API order.
    pub fn render(&self) -> String {
        let mut tree = String::from("File Structure:\n");
        for entry in self.entries.iter().filter(|e| !e.path.is_empty()) {
            tree.push_str(&format!("- {}\n", entry.path));
        }
        tree
    }

    pub fn candidates(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries
            .iter()
            .filter(|e| !e.path.is_empty() && e.is_candidate())
    }
}

// GitHub client
#[derive(Clone, Debug)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self, AnalysisError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("gh-readme-bot/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(GitHubClient {
            client: builder.build()?,
            api_base: config.github_api_base.trim_end_matches('/').to_string(),
            token: config.github_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Builds `{api_base}/repos/{owner}/{repo}/<segments...>` with each segment percent-encoded.
    fn repo_url<'a>(
        &self,
        repo: &RepositoryReference,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, AnalysisError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| AnalysisError::Parse(format!("{} ({})", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| AnalysisError::Parse(self.api_base.clone()))?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, AnalysisError> {
        let mut request = self.client.get(url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn fetch_metadata(
        &self,
        repo: &RepositoryReference,
    ) -> Result<RepoMetadata, AnalysisError> {
        info!("⬇️ Fetching repository data for {}", repo);

        let url = self.repo_url(repo, [])?;
        let metadata = self.get_json::<RepoMetadata>(url, &[]).await.map_err(|e| {
            error!("Failed to fetch repo data: {}", e);
            e
        })?;

        info!("Successfully fetched repository info for {}", repo);
        info!("Default branch is {}", metadata.default_branch());
        Ok(metadata)
    }

    pub async fn fetch_tree(
        &self,
        repo: &RepositoryReference,
        branch: &str,
    ) -> Result<TreeListing, AnalysisError> {
        let url = self.repo_url(repo, ["git", "trees"].into_iter().chain(branch.split('/')))?;
        let tree = self
            .get_json::<GitHubTree>(url, &[("recursive", "1")])
            .await
            .map_err(|e| {
                error!("Failed to fetch tree data: {}", e);
                e
            })?;

        if tree.truncated {
            warn!(
                "Tree for {} was truncated by the API; sampling a partial listing",
                repo
            );
        }
        info!(
            "🗂️ Successfully fetched repository tree ({} entries)",
            tree.tree.len()
        );

        Ok(TreeListing {
            entries: tree.tree,
        })
    }

    /// Raw contents response for one file on `branch`.
    pub async fn fetch_content(
        &self,
        repo: &RepositoryReference,
        branch: &str,
        path: &str,
    ) -> Result<GitHubContent, AnalysisError> {
        let url = self.repo_url(repo, ["contents"].into_iter().chain(path.split('/')))?;
        self.get_json::<GitHubContent>(url, &[("ref", branch)]).await
    }
}
