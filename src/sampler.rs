// Content sampling: fetch, decode and truncate every candidate file

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use futures::{StreamExt, stream};
use log::{error, info};

use crate::error::AnalysisError;
use crate::github::{GitHubClient, RepositoryReference, TreeListing};
use crate::llm::schemas::github_response::GitHubContent;

/// Characters of each file kept in the prompt.
pub const EXCERPT_CHARS: usize = 1000;

/// Appended after every excerpt, whether or not anything was cut.
pub const TRUNCATION_MARKER: &str = "...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentExcerpt {
    pub path: String,
    pub text: String,
}

impl ContentExcerpt {
    /// Keeps the first [`EXCERPT_CHARS`] characters of `content`.
    pub fn new(path: &str, content: &str) -> Self {
        ContentExcerpt {
            path: path.to_string(),
            text: content.chars().take(EXCERPT_CHARS).collect(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "\n### {}\n```\n{}{}\n```\n",
            self.path, self.text, TRUNCATION_MARKER
        )
    }
}

/// Decodes a contents payload to text.
///
/// `Ok(None)` means there is nothing to sample (no content, or whitespace only).
pub fn decode_content(
    path: &str,
    payload: &GitHubContent,
) -> Result<Option<String>, AnalysisError> {
    let raw = match payload.content.as_deref() {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    if let Some(encoding) = payload.encoding.as_deref() {
        if encoding != "base64" {
            return Err(AnalysisError::Decode {
                path: path.to_string(),
                reason: format!("unsupported encoding `{}`", encoding),
            });
        }
    }

    // GitHub wraps base64 at 60 columns
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64.decode(compact).map_err(|e| AnalysisError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let text = String::from_utf8(bytes).map_err(|e| AnalysisError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(text))
}

pub fn render_content_block(excerpts: &[ContentExcerpt]) -> String {
    let mut content = String::from("Code Analysis:\n");
    for excerpt in excerpts {
        content.push_str(&excerpt.render());
    }
    content
}

async fn sample_file(
    github: &GitHubClient,
    repo: &RepositoryReference,
    branch: &str,
    path: &str,
) -> Result<Option<ContentExcerpt>, AnalysisError> {
    let payload = github.fetch_content(repo, branch, path).await?;
    Ok(decode_content(path, &payload)?.map(|text| ContentExcerpt::new(path, &text)))
}

/// Samples every candidate in `listing`. Per-file failures are logged and skipped.
///
/// Up to `concurrency` fetches run at once; excerpts always come back in tree order.
pub async fn sample_contents(
    github: &GitHubClient,
    repo: &RepositoryReference,
    branch: &str,
    listing: &TreeListing,
    concurrency: usize,
) -> Result<Vec<ContentExcerpt>, AnalysisError> {
    let paths: Vec<String> = listing.candidates().map(|e| e.path.clone()).collect();
    let results = stream::iter(paths)
        .map(|path| async move {
            let outcome = sample_file(github, repo, branch, &path).await;
            (path, outcome)
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut excerpts = Vec::new();
    for (path, outcome) in results {
        match outcome {
            Ok(Some(excerpt)) => {
                info!("✅ Processed file: {}", path);
                excerpts.push(excerpt);
            }
            Ok(None) => info!("Skipping empty file: {}", path),
            Err(e @ AnalysisError::Decode { .. }) => {
                info!("Skipping binary file: {} ({})", path, e)
            }
            Err(e) if e.is_recoverable() => {
                error!("⚠️ Error fetching content for {}: {}", path, e)
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Successfully processed {} files ({} excerpts)",
        listing.entries.len(),
        excerpts.len()
    );
    Ok(excerpts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(text: &[u8]) -> GitHubContent {
        GitHubContent {
            content: Some(BASE64.encode(text)),
            encoding: Some("base64".to_string()),
        }
    }

    #[test]
    fn short_content_still_gets_the_truncation_marker() {
        let excerpt = ContentExcerpt::new("src/lib.rs", "pub fn hi() {}\n");
        assert_eq!(
            excerpt.render(),
            "\n### src/lib.rs\n```\npub fn hi() {}\n...\n```\n"
        );
    }

    #[test]
    fn long_content_is_cut_at_a_character_boundary() {
        let content = "é".repeat(EXCERPT_CHARS + 50);
        let excerpt = ContentExcerpt::new("notes.txt", &content);
        assert_eq!(excerpt.text.chars().count(), EXCERPT_CHARS);
        assert!(excerpt.render().ends_with("é...\n```\n"));
    }

    #[test]
    fn decodes_line_wrapped_base64() {
        let mut encoded = BASE64.encode("fn main() {\n    println!(\"hi\");\n}\n");
        encoded.insert(8, '\n');
        let payload = GitHubContent {
            content: Some(encoded),
            encoding: Some("base64".to_string()),
        };
        assert_eq!(
            decode_content("src/main.rs", &payload).unwrap().as_deref(),
            Some("fn main() {\n    println!(\"hi\");\n}\n")
        );
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = decode_content("blob.txt", &payload(&[0xff, 0xfe, 0x00, 0x9f])).unwrap_err();
        assert!(matches!(err, AnalysisError::Decode { ref path, .. } if path == "blob.txt"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn empty_and_whitespace_files_yield_nothing() {
        assert_eq!(decode_content("a", &payload(b"  \n\t\n")).unwrap(), None);
        assert_eq!(decode_content("b", &GitHubContent::default()).unwrap(), None);
        let empty = GitHubContent {
            content: Some(String::new()),
            encoding: Some("none".to_string()),
        };
        assert_eq!(decode_content("c", &empty).unwrap(), None);
    }

    #[test]
    fn non_base64_encoding_is_a_decode_error() {
        let payload = GitHubContent {
            content: Some("plain text".to_string()),
            encoding: Some("utf-8".to_string()),
        };
        let err = decode_content("odd.txt", &payload).unwrap_err();
        assert!(
            matches!(err, AnalysisError::Decode { ref reason, .. } if reason.contains("utf-8"))
        );
    }

    #[test]
    fn missing_encoding_is_treated_as_base64() {
        let payload = GitHubContent {
            content: Some(BASE64.encode("hello")),
            encoding: None,
        };
        assert_eq!(
            decode_content("hi.txt", &payload).unwrap().as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn content_block_keeps_excerpt_order() {
        let block = render_content_block(&[
            ContentExcerpt::new("b.rs", "b"),
            ContentExcerpt::new("a.rs", "a"),
        ]);
        assert_eq!(
            block,
            "Code Analysis:\n\n### b.rs\n```\nb...\n```\n\n### a.rs\n```\na...\n```\n"
        );
        assert_eq!(render_content_block(&[]), "Code Analysis:\n");
    }
}
