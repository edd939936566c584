//! CLI for the docpair extractor.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docpair::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "docpair")]
#[command(author, version, about = "Extracts function/docstring pairs from source corpora", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract documented definitions into sharded JSONL files
    Extract {
        /// Only process entries of this language
        #[arg(long)]
        language: Option<String>,

        /// Directory the batch files are written to
        #[arg(long)]
        save_path: Option<PathBuf>,

        /// JSONL file, or directory of JSONL files, to read
        #[arg(long)]
        data_path: Option<PathBuf>,

        /// Number of output shards
        #[arg(short = 's', long = "split")]
        shards: Option<usize>,

        /// Number of worker threads
        #[arg(long)]
        workers: Option<usize>,

        /// YAML or JSON file with run settings; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show supported languages
    Languages,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            language,
            save_path,
            data_path,
            shards,
            workers,
            config,
        } => {
            let mut settings = match config {
                Some(path) => PipelineConfig::from_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => PipelineConfig::default(),
            };
            if language.is_some() {
                settings.language = language;
            }
            if let Some(save_path) = save_path {
                settings.output_dir = save_path;
            }
            if let Some(data_path) = data_path {
                settings.data_path = data_path;
            }
            if let Some(shards) = shards {
                settings.shards = shards;
            }
            if let Some(workers) = workers {
                settings.workers = workers;
            }
            cmd_extract(&settings)
        }
        Commands::Languages => cmd_languages(),
    }
}

fn cmd_extract(config: &PipelineConfig) -> Result<()> {
    let started = Instant::now();

    let dataset = Dataset::load(&config.data_path, &config.dataset_glob)
        .with_context(|| format!("Failed to load dataset {}", config.data_path.display()))?;
    let summary = run(dataset, config).context("Extraction failed")?;

    println!("Elapsed: {:.2}s", started.elapsed().as_secs_f64());
    println!(
        "Extracted {} samples from {} entries into {}",
        summary.records,
        summary.entries,
        config.output_dir.display()
    );
    Ok(())
}

fn cmd_languages() -> Result<()> {
    let registry = LanguageRegistry::new();
    println!("Supported languages:");
    for lang in registry.all() {
        let mut line = format!("  {} (extensions: {})", lang.name(), lang.extensions().join(", "));
        if !lang.aliases().is_empty() {
            line.push_str(&format!(", aliases: {}", lang.aliases().join(", ")));
        }
        println!("{line}");
    }
    Ok(())
}
