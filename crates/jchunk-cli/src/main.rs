//! CLI binary for jchunk: turn a Java project into class- or method-level chunk records.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jchunk_core::config::ChunkerConfig;
use jchunk_core::report::ChunkLevel;
use jchunk_engine::Chunker;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "jchunk", about = "Java code chunking for indexing and search")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Config file (defaults to <project>/.jchunk/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the analysis commands.
#[derive(Args, Debug, Clone, Default)]
struct Selection {
    /// Emit one chunk per method and constructor instead of per type
    #[arg(short, long, conflicts_with = "level")]
    method: bool,

    /// Granularity: CLASS or METHOD (defaults to the configured level)
    #[arg(long)]
    level: Option<String>,

    /// Regex a file path must fully match to be included (repeatable)
    #[arg(short, long)]
    include: Vec<String>,

    /// Regex that excludes a file path when it fully matches (repeatable)
    #[arg(short, long)]
    exclude: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every chunk of the project into one report file
    Analyze {
        /// Report file to write
        #[arg(short, long, default_value = "chunks.json")]
        output: PathBuf,

        #[command(flatten)]
        selection: Selection,
    },

    /// Write one file per type (or per class of methods) plus a project summary
    Split {
        /// Directory for the generated files
        #[arg(short, long, default_value = "chunks")]
        output_dir: PathBuf,

        #[command(flatten)]
        selection: Selection,
    },

    /// Show the totals recorded in a report or project summary
    Info {
        /// Report or project-summary.json file
        file: PathBuf,
    },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn load_config(cli: &Cli, project_root: &Path) -> Result<ChunkerConfig> {
    match &cli.config {
        Some(path) => ChunkerConfig::load_from(path),
        None => ChunkerConfig::load(project_root),
    }
}

/// `--method` wins, then `--level`, then the configured default.
fn resolve_level(selection: &Selection, config: &ChunkerConfig) -> Result<ChunkLevel> {
    if selection.method {
        return Ok(ChunkLevel::Method);
    }
    match &selection.level {
        Some(level) => Ok(level.parse()?),
        None => config.chunk.level(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;

    match &cli.command {
        Commands::Analyze { output, selection } => {
            let config = load_config(&cli, &project_root)?;
            cmd_analyze(&project_root, config, selection, output)
        }
        Commands::Split {
            output_dir,
            selection,
        } => {
            let config = load_config(&cli, &project_root)?;
            cmd_split(&project_root, config, selection, output_dir)
        }
        Commands::Info { file } => cmd_info(file),
    }
}

fn spinner(message: &str) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn cmd_analyze(
    project_root: &Path,
    config: ChunkerConfig,
    selection: &Selection,
    output: &Path,
) -> Result<()> {
    let level = resolve_level(selection, &config)?;
    let pretty = config.output.pretty_print;
    let chunker = Chunker::new(config);

    let sp = spinner(&format!("Chunking {} ({} level)...", project_root.display(), level));
    let report = chunker.analyze(project_root, level, &selection.include, &selection.exclude);
    sp.finish_and_clear();
    let report = report?;

    report.write(output, pretty)?;

    eprintln!("Analysis complete ({} level)", report.level());
    eprintln!("  Files found:     {}", report.total_files());
    eprintln!("  Files processed: {}", report.processed_files());
    eprintln!("  Files failed:    {}", report.error_files());
    match report.level() {
        ChunkLevel::Class => eprintln!("  Types:           {}", report.entity_count()),
        ChunkLevel::Method => eprintln!("  Members:         {}", report.entity_count()),
    }
    eprintln!("  Output:          {}", output.display());
    Ok(())
}

fn cmd_split(
    project_root: &Path,
    config: ChunkerConfig,
    selection: &Selection,
    output_dir: &Path,
) -> Result<()> {
    let level = resolve_level(selection, &config)?;
    let chunker = Chunker::new(config);

    let sp = spinner(&format!("Chunking {} ({} level)...", project_root.display(), level));
    let summary = chunker.generate_files(
        project_root,
        level,
        &selection.include,
        &selection.exclude,
        output_dir,
    );
    sp.finish_and_clear();
    let summary = summary?;

    eprintln!("Split complete ({})", summary.analysis_type);
    eprintln!("  Files found:     {}", summary.total_files);
    eprintln!("  Files processed: {}", summary.processed_files);
    eprintln!("  Files failed:    {}", summary.error_files);
    eprintln!("  Types:           {}", summary.total_classes);
    if let Some(methods) = summary.total_methods {
        eprintln!("  Members:         {}", methods);
    }
    eprintln!(
        "  Wrote {} files to {}",
        summary.output_files.len() + 1,
        output_dir.display()
    );
    Ok(())
}

fn cmd_info(file: &Path) -> Result<()> {
    let value: serde_json::Value = jchunk_core::storage::read_report(file)?;
    let field = |name: &str| -> String {
        match value.get(name) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(v) if !v.is_null() => v.to_string(),
            _ => "-".to_string(),
        }
    };

    let mode = value
        .get("analysisType")
        .or_else(|| value.get("analysisLevel"))
        .and_then(|v| v.as_str())
        .context("not a jchunk report or project summary")?;

    println!("Project: {}", field("projectPath"));
    println!("Mode: {}", mode);
    println!("Created: {}", field("timestamp"));
    println!();
    println!("Files: {}", field("totalFiles"));
    println!("Processed: {}", field("processedFiles"));
    println!("Failed: {}", field("errorFiles"));
    println!("Types: {}", field("totalClasses"));
    println!("Members: {}", field("totalMethods"));
    if let Some(chunks) = value.get("chunks").and_then(|c| c.as_array()) {
        println!("Chunks: {}", chunks.len());
    }
    if let Some(files) = value.get("outputFiles").and_then(|c| c.as_array()) {
        println!("Artifacts: {}", files.len());
    }
    Ok(())
}
