// gh-readme-bot - generate a README.md for a GitHub repository with an LLM

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use log::info;
use simple_logger::SimpleLogger;
use tokio::fs;

use gh_readme_bot::config::{DEFAULT_COMPLETION_API_BASE, DEFAULT_GITHUB_API_BASE, DEFAULT_MODEL};
use gh_readme_bot::{AnalysisContext, Config, ReadmeGenerator};

// Command-line arguments

#[derive(Parser, Debug)]
#[clap(
    name = "gh-readme-bot",
    about = "Generate a README.md for a GitHub repository with an LLM",
    version
)]
struct Args {
    /// Repository URL, e.g. https://github.com/owner/repo
    repo_url: String,

    /// Write the Markdown here instead of stdout
    #[clap(long, short)]
    output: Option<String>,

    /// GitHub access token
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// API key for the completion endpoint
    #[clap(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[clap(long, env = "GITHUB_API_BASE", default_value = DEFAULT_GITHUB_API_BASE)]
    github_api_base: String,

    /// OpenAI-compatible API root
    #[clap(long, env = "COMPLETION_API_BASE", default_value = DEFAULT_COMPLETION_API_BASE)]
    completion_api_base: String,

    #[clap(long, env = "README_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Parallel file fetches (1 = sequential)
    #[clap(long, env = "CONCURRENCY", default_value = "1")]
    concurrency: usize,

    /// Per-request HTTP timeout in seconds
    #[clap(long, env = "HTTP_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Debug-level logging
    #[clap(long, short)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            github_api_base: self.github_api_base.clone(),
            github_token: self.github_token.clone(),
            completion_api_base: self.completion_api_base.clone(),
            completion_api_key: self.api_key.clone(),
            model: self.model.clone(),
            concurrency: self.concurrency,
            timeout: self.timeout_secs.map(Duration::from_secs),
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .map_err(|e| anyhow!("logger setup failed: {}", e))?;

    let generator = ReadmeGenerator::new(&args.config()).context("failed to build HTTP clients")?;

    // Run the whole pipeline on its own task
    let markdown = generator
        .spawn(args.repo_url.clone(), AnalysisContext::new())
        .await
        .context("analysis task panicked")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &markdown)
                .await
                .with_context(|| format!("failed to write {}", path))?;
            info!("📝 README written to {}", path);
        }
        None => println!("{}", markdown),
    }

    Ok(())
}
