//! Argument parsing and command dispatch.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use websift_search::config::{DEFAULT_FETCH_COUNT, DEFAULT_LIMIT, DEFAULT_REGION};
use websift_search::{FetchOptions, SearchConfig, SearchOptions};

/// Web search with provider fallback and page content enrichment.
#[derive(Debug, Parser)]
#[command(name = "websift", version, about)]
pub struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Credential for the API provider. Without one only the markup provider is used.
    #[arg(long, env = "PERPLEXITY_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for a single query.
    Search {
        /// The search query.
        query: String,

        /// Maximum number of results.
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Markup provider region code.
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
    },

    /// Search for several queries concurrently.
    Multi {
        /// The search queries.
        #[arg(required = true)]
        queries: Vec<String>,

        /// Maximum number of results per query.
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Markup provider region code.
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
    },

    /// Search, then fetch the text of the top results.
    Fetch {
        /// The search query.
        query: String,

        /// Number of top results to fetch.
        #[arg(short = 'n', long, default_value_t = DEFAULT_FETCH_COUNT)]
        count: usize,

        /// Markup provider region code.
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
    },
}

impl Cli {
    /// Build the search configuration from the config file and credential.
    ///
    /// A credential given on the command line or in the environment
    /// overrides one from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or is invalid.
    pub fn load_config(&self) -> anyhow::Result<SearchConfig> {
        let mut config = match self.config {
            Some(ref path) => SearchConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SearchConfig::default(),
        };
        if let Some(ref key) = self.api_key {
            config = config.with_api_key(key.clone());
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Run the selected command and render its envelope as JSON.
///
/// # Errors
///
/// Returns an error if the configuration is unusable or the output cannot
/// be serialized. Search failures are reported inside the envelope.
pub async fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = cli.load_config()?;
    tracing::debug!(
        api = config.credential().is_some(),
        markup_base_url = %config.markup_base_url,
        "configuration loaded"
    );

    let value = match cli.command {
        Command::Search {
            ref query,
            limit,
            ref region,
        } => {
            let options = SearchOptions {
                limit,
                region: region.clone(),
            };
            let envelope = websift_search::search(query, &options, &config).await;
            tracing::info!(source = %envelope.source, total = envelope.total, "search finished");
            serde_json::to_value(&envelope)?
        }
        Command::Multi {
            ref queries,
            limit,
            ref region,
        } => {
            let options = SearchOptions {
                limit,
                region: region.clone(),
            };
            let multi =
                websift_search::search_multiple(queries.as_slice(), &options, &config).await;
            tracing::info!(
                queries = multi.queries.len(),
                total = multi.total_results,
                "multi-query search finished"
            );
            serde_json::to_value(&multi)?
        }
        Command::Fetch {
            ref query,
            count,
            ref region,
        } => {
            let options = FetchOptions {
                fetch_count: count,
                region: region.clone(),
            };
            let enriched = websift_search::search_and_fetch(query, &options, &config).await;
            let failed = enriched
                .fetched_content
                .iter()
                .filter(|item| item.fetch_error.is_some())
                .count();
            tracing::info!(
                fetched = enriched.fetched_content.len(),
                failed,
                "search and fetch finished"
            );
            serde_json::to_value(&enriched)?
        }
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(rendered)
}
