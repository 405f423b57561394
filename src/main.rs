//! RuCoS Loader CLI
//!
//! Inspect and convert cloze reading-comprehension datasets.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rucos_loader::{
    config::Config,
    loader::{DatasetLoader, LoaderOptions},
    parsed::{DatasetStats, ParsedParagraph, write_jsonl},
};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// RuCoS Loader - parse cloze reading-comprehension datasets into ranked candidates
#[derive(Parser)]
#[command(name = "rucos-loader")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse records and write them as JSON Lines
    Parse {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print summary counts for the selected records
    Stats {
        #[command(flatten)]
        dataset: DatasetArgs,
    },

    /// Show the candidates of a single record
    Show {
        /// Zero-based line index of the record
        index: usize,

        #[command(flatten)]
        dataset: DatasetArgs,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

/// Loader options settable from the command line.
#[derive(Args)]
struct DatasetArgs {
    /// Path to the JSONL dataset (overrides config)
    path: Option<PathBuf>,

    /// Do not compute candidate labels
    #[arg(long)]
    no_labels: bool,

    /// Maximum number of records to read
    #[arg(long)]
    nrows: Option<usize>,

    /// Zero-based line to start reading from
    #[arg(long)]
    start_row: Option<usize>,

    /// Select records by line index (repeatable, order preserved)
    #[arg(long = "idx")]
    idxs: Vec<usize>,

    /// Query construction mode: replace or concatenate
    #[arg(long)]
    mode: Option<String>,

    /// Add gold answers to the candidate pool
    #[arg(long)]
    extend_entities: bool,
}

impl DatasetArgs {
    fn apply(self, options: &mut LoaderOptions) {
        if let Some(path) = self.path {
            options.path = path;
        }
        if self.no_labels {
            options.has_labels = false;
        }
        if self.nrows.is_some() {
            options.nrows = self.nrows;
        }
        if let Some(start_row) = self.start_row {
            options.start_row = start_row;
        }
        if !self.idxs.is_empty() {
            options.text_idxs = Some(self.idxs);
        }
        if let Some(mode) = self.mode {
            options.query_placeholder_union_mode = mode;
        }
        if self.extend_entities {
            options.extend_entities_with_answers = true;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse { dataset, output } => cmd_parse(cli.config, dataset, output),
        Commands::Stats { dataset } => cmd_stats(cli.config, dataset),
        Commands::Show {
            index,
            dataset,
            json,
        } => cmd_show(cli.config, index, dataset, json),
        Commands::Config => cmd_config(cli.config),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "rucos_loader=debug"
    } else {
        "rucos_loader=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Merge config file, environment and command-line options into a loader.
fn build_loader(config_path: Option<PathBuf>, args: DatasetArgs) -> Result<DatasetLoader> {
    let mut config =
        Config::load(config_path.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config.dataset);
    config.validate().context("Invalid configuration")?;

    DatasetLoader::new(config.dataset).context("Invalid loader options")
}

fn load(loader: &DatasetLoader) -> Result<Vec<ParsedParagraph>> {
    let start = Instant::now();
    let paragraphs = loader
        .load()
        .with_context(|| format!("Failed to load '{}'", loader.path().display()))?;
    tracing::debug!(elapsed = ?start.elapsed(), "load finished");
    Ok(paragraphs)
}

fn cmd_parse(config_path: Option<PathBuf>, args: DatasetArgs, output: Option<PathBuf>) -> Result<()> {
    let loader = build_loader(config_path, args)?;
    let paragraphs = load(&loader)?;

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            write_jsonl(&paragraphs, BufWriter::new(file)).context("Failed to write records")?;
            eprintln!(
                "Wrote {} records to {}",
                paragraphs.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            write_jsonl(&paragraphs, stdout.lock()).context("Failed to write records")?;
        }
    }

    Ok(())
}

fn cmd_stats(config_path: Option<PathBuf>, args: DatasetArgs) -> Result<()> {
    let loader = build_loader(config_path, args)?;
    let paragraphs = load(&loader)?;
    let stats = DatasetStats::from_paragraphs(&paragraphs);

    println!("Dataset Statistics");
    println!("{}", "─".repeat(40));
    println!("  Source:              {}", loader.path().display());
    println!("  Mode:                {}", loader.union_mode());
    println!("  Paragraphs:          {}", stats.paragraphs);
    println!("  Candidates:          {}", stats.candidates);
    println!("  Mean per paragraph:  {:.2}", stats.mean_candidates());

    if loader.options().has_labels {
        println!("  Gold candidates:     {}", stats.gold_candidates);
        println!("  Without gold:        {}", stats.paragraphs_without_gold);
    } else {
        println!("  Labels:              disabled");
    }

    Ok(())
}

fn cmd_show(config_path: Option<PathBuf>, index: usize, mut args: DatasetArgs, json: bool) -> Result<()> {
    args.idxs = vec![index];
    let loader = build_loader(config_path, args)?;
    let paragraphs = load(&loader)?;
    let paragraph = paragraphs
        .first()
        .context("Loader returned no record")?;

    if json {
        println!("{}", paragraph.to_json_pretty()?);
        return Ok(());
    }

    println!("Record {} (line {})", paragraph.idx, index);
    println!("{}", "─".repeat(60));
    let preview: String = paragraph.text1.chars().take(300).collect();
    println!("{}", preview);
    if paragraph.text1.chars().count() > 300 {
        println!("...");
    }
    println!("{}", "─".repeat(60));

    for (i, candidate) in paragraph.candidates.iter().enumerate() {
        let label = match candidate.label {
            Some(1) => "+",
            Some(_) => "-",
            None => " ",
        };
        println!(
            "{:>3}. [{}] {} [{}..{}]",
            i + 1,
            label,
            candidate.placeholder,
            candidate.start_char,
            candidate.end_char
        );
        println!("       {}", candidate.text2);
    }

    println!("{}", "─".repeat(60));
    println!("{} candidates", paragraph.candidates.len());

    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;

    println!("Configuration:");
    match Config::config_file_path() {
        Some(path) => println!("  Config file:  {}", path.display()),
        None => println!("  Config file:  (no config directory)"),
    }
    println!();
    print!(
        "{}",
        serde_yaml::to_string(&config).context("Failed to serialize configuration")?
    );

    if let Err(e) = config.validate() {
        println!("\nConfiguration error: {}", e);
    }

    Ok(())
}
