// Post-processing for generated text

use regex::Regex;
use std::sync::LazyLock;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));
static EXTRA_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Strips `<think>…</think>` spans, squeezes 3+ newlines down to 2 and trims.
pub fn sanitize(generated: &str) -> String {
    let mut cleaned = generated.to_string();
    // A removal can splice a new pair together, so repeat until none is left.
    while THINK_BLOCK.is_match(&cleaned) {
        cleaned = THINK_BLOCK.replace_all(&cleaned, "").into_owned();
    }
    let cleaned = EXTRA_BLANK_LINES.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}
