// Run stamp, attribution footer and the error report

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static DATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Current Date and Time \(UTC - YYYY-MM-DD HH:MM:SS formatted\): (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})",
    )
    .expect("valid regex")
});
static LOGIN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Current User's Login: (\w+)").expect("valid regex"));

/// Date and login attached to a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunStamp {
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    pub date: String,
    pub login: String,
}

impl RunStamp {
    /// Reads the stamp out of `log_text`, falling back to `now` and `"unknown"`.
    pub fn from_log(log_text: &str, now: DateTime<Utc>) -> Self {
        let date = DATE_LINE
            .captures(log_text)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| now.format("%Y-%m-%d %H:%M:%S").to_string());
        let login = LOGIN_LINE
            .captures(log_text)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "unknown".to_string());

        RunStamp { date, login }
    }

    pub fn footer(&self) -> String {
        format!("\n\n---\n*Generated by GH-Readme-Bot on {} UTC*", self.date)
    }
}

/// Markdown returned in place of a README when a run fails.
pub fn error_report(message: &str, stamp: &RunStamp) -> String {
    format!(
        r#"# Repository Analysis Error

An error occurred while analyzing the repository:
`{message}`

Please check:
1. Repository access permissions
2. API key configuration
3. Network connectivity{footer}"#,
        footer = stamp.footer(),
    )
}
