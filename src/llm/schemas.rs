// Wire schemas for the GitHub and chat-completion APIs

// GitHub API responses
pub mod github_response {
    use serde::{Deserialize, Serialize};

    /// `GET /repos/{owner}/{repo}`. Every field may be absent or null.
    #[derive(Clone, Debug, Default, Deserialize, Serialize)]
    #[serde(default)]
    pub struct RepoMetadata {
        pub name: Option<String>,
        pub description: Option<String>,
        pub language: Option<String>,
        pub topics: Option<Vec<String>>,
        pub stargazers_count: Option<u64>,
        pub forks_count: Option<u64>,
        pub created_at: Option<String>,
        pub updated_at: Option<String>,
        pub default_branch: Option<String>,
    }

    impl RepoMetadata {
        pub fn default_branch(&self) -> &str {
            self.default_branch.as_deref().unwrap_or("main")
        }

        /// Fixed-order summary block for the prompt.
        pub fn summary(&self) -> String {
            let topics = match self.topics.as_deref() {
                Some(topics) if !topics.is_empty() => topics.join(", "),
                _ => "None specified".to_string(),
            };

            format!(
                "Repository Information:\n\
                 - Name: {}\n\
                 - Description: {}\n\
                 - Primary Language: {}\n\
                 - Topics: {}\n\
                 - Stars: {}\n\
                 - Forks: {}\n\
                 - Created: {}\n\
                 - Last Updated: {}\n",
                self.name.as_deref().unwrap_or("Unknown"),
                self.description.as_deref().unwrap_or("No description provided"),
                self.language.as_deref().unwrap_or("Not specified"),
                topics,
                self.stargazers_count.unwrap_or(0),
                self.forks_count.unwrap_or(0),
                self.created_at.as_deref().unwrap_or("Unknown"),
                self.updated_at.as_deref().unwrap_or("Unknown"),
            )
        }
    }

    /// Tree item kind. Submodules show up as `commit`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum EntryKind {
        Blob,
        Tree,
        #[default]
        #[serde(other)]
        Other,
    }

    #[derive(Clone, Debug, Deserialize, Serialize)]
    pub struct TreeEntry {
        #[serde(default)]
        pub path: String,
        #[serde(rename = "type", default)]
        pub kind: EntryKind,
    }

    /// `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`
    #[derive(Clone, Debug, Default, Deserialize, Serialize)]
    #[serde(default)]
    pub struct GitHubTree {
        pub tree: Vec<TreeEntry>,
        pub truncated: bool,
    }

    /// `GET /repos/{owner}/{repo}/contents/{path}`. `encoding` is `base64` for
    /// normal files and `none` for ones too large to inline.
    #[derive(Clone, Debug, Default, Deserialize, Serialize)]
    #[serde(default)]
    pub struct GitHubContent {
        pub content: Option<String>,
        pub encoding: Option<String>,
    }
}

// Chat-completion API (OpenAI-compatible)
pub mod openai_response {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Deserialize, Serialize)]
    pub struct ChatMessage {
        pub role: String,
        #[serde(default)]
        pub content: Option<String>,
    }

    #[derive(Debug, Serialize)]
    pub struct ChatRequest<'a> {
        pub model: &'a str,
        pub messages: Vec<ChatMessage>,
        pub temperature: f32,
        pub max_tokens: usize,
    }

    #[derive(Debug, Deserialize)]
    pub struct OpenAIUsage {
        pub total_tokens: usize,
    }

    #[derive(Debug, Deserialize)]
    pub struct OpenAIChoice {
        pub message: ChatMessage,
    }

    #[derive(Debug, Deserialize)]
    pub struct OpenAIResponse {
        #[serde(default)]
        pub choices: Vec<OpenAIChoice>,
        #[serde(default)]
        pub usage: Option<OpenAIUsage>,
    }
}
