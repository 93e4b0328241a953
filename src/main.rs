use anyhow::Context;
use clap::{Parser, Subcommand};
use prayer_search::ai::{CompletionProvider, HttpCompletionProvider};
use prayer_search::config::EngineConfig;
use prayer_search::models::Corpus;
use prayer_search::search::{SearchEngine, SearchOptions, SemanticSearchOptions};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "prayer-search")]
#[command(version, about = "Search a prayer corpus", long_about = None)]
struct Cli {
    /// Corpus JSON file (array of documents)
    #[arg(short, long, env = "PRAYER_SEARCH_CORPUS", default_value = "data/prayers.json")]
    corpus: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Keyword search
    Search {
        query: String,

        /// Restrict to these categories
        #[arg(short, long)]
        category: Vec<String>,

        /// Restrict to documents with any of these tags
        #[arg(short, long)]
        tag: Vec<String>,

        #[arg(long)]
        no_fuzzy: bool,

        #[arg(long)]
        no_semantic: bool,

        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(long)]
        min_score: Option<f64>,
    },

    /// Keyword search refined by the language model
    Semantic {
        query: String,

        /// Skip the language model
        #[arg(long)]
        no_ai: bool,

        #[arg(long)]
        no_rerank: bool,

        /// Do not send recent queries as context
        #[arg(long)]
        no_context: bool,

        #[arg(short, long, default_value = "10")]
        limit: usize,

        #[arg(long, default_value = "0.3")]
        min_confidence: f64,
    },

    /// Autocomplete a partial query
    Suggest {
        partial: String,

        #[arg(short, long, default_value = "8")]
        limit: usize,

        /// Also ask the language model
        #[arg(long)]
        ai: bool,
    },

    /// Show index statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EngineConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    let corpus = Corpus::from_json_file(&cli.corpus)
        .with_context(|| format!("Failed to load corpus from {}", cli.corpus.display()))?;

    let engine = SearchEngine::from_config(corpus, &config, completion_provider(&config))?;

    match cli.command {
        Commands::Search {
            query,
            category,
            tag,
            no_fuzzy,
            no_semantic,
            limit,
            min_score,
        } => {
            let defaults = engine.config().options(query);
            let options = defaults
                .clone()
                .with_categories(category)
                .with_tags(tag)
                .with_fuzzy(!no_fuzzy)
                .with_semantic(!no_semantic)
                .with_limit(limit.unwrap_or(defaults.limit))
                .with_min_score(min_score.unwrap_or(defaults.min_score));

            print_json(&engine.search(&options))?;
        }
        Commands::Semantic {
            query,
            no_ai,
            no_rerank,
            no_context,
            limit,
            min_confidence,
        } => {
            let options = SemanticSearchOptions::new(query)
                .with_ai(!no_ai)
                .with_rerank(!no_rerank)
                .with_contextual(!no_context)
                .with_limit(limit)
                .with_min_confidence(min_confidence);

            print_json(&engine.semantic_search(&options).await)?;
        }
        Commands::Suggest { partial, limit, ai } => {
            let mut suggestions = serde_json::json!({
                "suggestions": engine.suggest(&partial, limit),
            });
            if ai {
                suggestions["ai"] = serde_json::json!(engine.ai_suggestions(&partial, limit).await);
            }
            print_json(&suggestions)?;
        }
        Commands::Stats => {
            print_json(&engine.stats())?;
        }
    }

    engine.flush_analytics().await;
    Ok(())
}

fn init_tracing(config: &EngineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("prayer_search={}", config.observability.log_level).into());
    let json = config.observability.json_logs;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

/// HTTP provider when AI is enabled and an API key is available
fn completion_provider(config: &EngineConfig) -> Option<Arc<dyn CompletionProvider>> {
    if !config.ai.enabled {
        return None;
    }

    match HttpCompletionProvider::new(&config.ai) {
        Ok(provider) if provider.has_api_key() => Some(Arc::new(provider)),
        Ok(_) => {
            tracing::info!(
                env = %config.ai.api_key_env,
                "No API key set, semantic search will use keyword results"
            );
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create completion provider");
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
