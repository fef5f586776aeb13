//! Barkeep CLI - graph-backed cocktail retrieval with self-refinement
//!
//! This binary provides the command-line interface for the barkeep system.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::Result;
use barkeep::report::{render_categories, render_classification, render_outcome};
use barkeep::App;
use barkeep_core::config::Config;
use barkeep_core::StrategyId;
use barkeep_refinement::RefinementRequest;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "barkeep")]
#[command(about = "Cocktail retrieval over a knowledge graph with self-refinement")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a cocktail question with the refinement loop
    Ask {
        /// Question text
        text: String,
        /// Image path or URL to describe and prepend to the question
        #[arg(long, value_name = "PATH_OR_URL")]
        image: Option<String>,
        /// Skip classification and use this strategy (c1, c2, c3, c4)
        #[arg(long)]
        strategy: Option<StrategyId>,
        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which strategy the classifier picks for a question
    Classify {
        text: String,
    },
    /// Show the keywords extracted for a question under one strategy
    Keywords {
        text: String,
        #[arg(long)]
        strategy: StrategyId,
    },
    /// List the cocktail categories in the graph
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let Some(command) = cli.command else {
        println!(
            "Run 'barkeep ask \"<question>\"' to search for cocktails, or --help for more options"
        );
        return Ok(());
    };

    let config = load_config(cli.config.as_deref())?;
    let app = App::from_config(&config).await?;

    match command {
        Commands::Ask {
            text,
            image,
            strategy,
            json,
        } => ask(&app, text, image, strategy, json).await,
        Commands::Classify { text } => {
            let classification = app.classifier.classify(&text).await?;
            println!("{}", render_classification(&classification));
            Ok(())
        }
        Commands::Keywords { text, strategy } => {
            let keywords = app.resolver.resolve(strategy, &text).await;
            println!("{}", serde_json::to_string_pretty(&keywords)?);
            Ok(())
        }
        Commands::Categories => {
            let categories = app.store.category_names().await?;
            println!("{}", render_categories(&categories));
            Ok(())
        }
    }
}

const LOG_TARGETS: &[&str] = &[
    "barkeep",
    "barkeep_core",
    "barkeep_storage",
    "barkeep_embeddings",
    "barkeep_llm",
    "barkeep_retrieval",
    "barkeep_refinement",
];

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            LOG_TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(","),
        )
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path)?;
    config.validate()?;
    info!(
        "Using {} model {} and {} embeddings",
        config.llm.provider, config.llm.model, config.embeddings.provider
    );
    Ok(config)
}

async fn ask(
    app: &App,
    text: String,
    image: Option<String>,
    strategy: Option<StrategyId>,
    json: bool,
) -> Result<()> {
    let mut request = RefinementRequest::new(text);
    if let Some(image) = image {
        request = request.with_image(image);
    }
    if let Some(strategy) = strategy {
        request = request.with_strategy(strategy);
    }

    let outcome = app.refinement.run(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", render_outcome(&outcome));
    }
    Ok(())
}
