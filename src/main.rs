//! CLI entry point for `spamprep`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use spamprep::config::{Config, StopwordSet};
use spamprep::corpus::{AssemblyReport, CleaningReport};
use spamprep::export;
use spamprep::features::RankedFeature;
use spamprep::model::corpus::Label;
use spamprep::model::email::NormalizeMode;
use spamprep::pipeline::{self, FeatureOutput};

#[derive(Parser)]
#[command(
    name = "spamprep",
    version,
    about = "Parse, normalize, deduplicate and vectorize a labeled ham/spam email corpus"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over the ham and spam directories
    Run {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        features: FeatureArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Assemble and clean the corpus, optionally writing it as CSV
    Corpus {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Write the cleaned corpus table here
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Extract features from a corpus table written by `corpus`
    Features {
        /// Corpus CSV file (`email,label`, plus per-field columns in structured mode)
        input: PathBuf,
        #[command(flatten)]
        features: FeatureArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Also write it to the configuration file
        #[arg(long)]
        save: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory of ham messages
    #[arg(long, value_name = "DIR")]
    ham: Option<PathBuf>,
    /// Directory of spam messages
    #[arg(long, value_name = "DIR")]
    spam: Option<PathBuf>,
    /// How messages are flattened into text
    #[arg(long, value_enum)]
    mode: Option<NormalizeMode>,
}

#[derive(Args)]
struct FeatureArgs {
    /// Maximum vocabulary size
    #[arg(long)]
    max_features: Option<usize>,
    /// Number of ranked terms to report
    #[arg(long)]
    top_n: Option<usize>,
    /// Shortest token kept
    #[arg(long)]
    min_token_length: Option<usize>,
    /// Built-in stopword set
    #[arg(long, value_enum)]
    stopwords: Option<StopwordSet>,
    /// Custom stopword list, one word per line
    #[arg(long, value_name = "FILE")]
    stopwords_file: Option<PathBuf>,
}

#[derive(Args)]
struct OutputArgs {
    /// Write the feature table (`email,label,<terms>...`) as CSV
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Write the ranked terms as JSON
    #[arg(long, value_name = "FILE")]
    ranked_output: Option<PathBuf>,
    /// Print the summary as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl CorpusArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(ref ham) = self.ham {
            config.corpus.ham_dir = ham.clone();
        }
        if let Some(ref spam) = self.spam {
            config.corpus.spam_dir = spam.clone();
        }
        if let Some(mode) = self.mode {
            config.corpus.normalize_mode = mode;
        }
    }
}

impl FeatureArgs {
    fn apply(&self, config: &mut Config) {
        let f = &mut config.features;
        if let Some(n) = self.max_features {
            f.max_features = n;
        }
        if let Some(n) = self.top_n {
            f.top_n_features = n;
        }
        if let Some(n) = self.min_token_length {
            f.min_token_length = n;
        }
        if let Some(set) = self.stopwords {
            f.stopwords = set;
        }
        if let Some(ref path) = self.stopwords_file {
            f.stopwords_file = Some(path.clone());
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = spamprep::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    setup_logging(&log_level, &config);

    match cli.command {
        Commands::Run {
            corpus,
            features,
            output,
        } => {
            corpus.apply(&mut config);
            features.apply(&mut config);
            cmd_run(&config, &output)
        }
        Commands::Corpus {
            corpus,
            output,
            json,
        } => {
            corpus.apply(&mut config);
            cmd_corpus(&config, output.as_deref(), json)
        }
        Commands::Features {
            input,
            features,
            output,
        } => {
            features.apply(&mut config);
            cmd_features(&config, &input, &output)
        }
        Commands::Config { save } => cmd_config(&config, save),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = spamprep::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "spamprep.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

fn assembly_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Parsing [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );
    pb
}

/// Full pipeline over the configured directories.
fn cmd_run(config: &Config, output: &OutputArgs) -> anyhow::Result<()> {
    let pb = assembly_progress_bar();
    let start = Instant::now();

    let progress = |current: u64, total: u64| {
        pb.set_length(total);
        pb.set_position(current);
    };
    let result = pipeline::run(config, Some(&progress));
    pb.finish_and_clear();
    let result = result?;

    write_outputs(&result.features, output)?;

    if output.json {
        let summary = export::json::summary_json(&result);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_assembly_table(&result.assembly);
        print_features_table(&result.features, start.elapsed());
    }
    Ok(())
}

/// Assemble and clean only.
fn cmd_corpus(config: &Config, output: Option<&Path>, json: bool) -> anyhow::Result<()> {
    config.validate()?;

    let pb = assembly_progress_bar();
    let progress = |current: u64, total: u64| {
        pb.set_length(total);
        pb.set_position(current);
    };
    let assembly = spamprep::corpus::assemble(
        &config.corpus.ham_dir,
        &config.corpus.spam_dir,
        config.corpus.normalize_mode,
        Some(&progress),
    );
    pb.finish_and_clear();
    let assembly = assembly?;

    let (cleaned, cleaning) = spamprep::corpus::clean(assembly.rows);

    if let Some(path) = output {
        create_parent(path)?;
        export::csv::write_corpus(cleaned.rows(), path)?;
    }

    if json {
        let summary = serde_json::json!({
            "assembly": export::json::assembly_json(&assembly.report),
            "cleaning": cleaning,
            "rows": cleaned.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_assembly_table(&assembly.report);
        print_cleaning_table(&cleaning);
        if let Some(path) = output {
            println!("  {:<25} {}", "Corpus table", path.display());
        }
        println!();
    }
    Ok(())
}

/// Feature stages over a previously written corpus table.
fn cmd_features(config: &Config, input: &Path, output: &OutputArgs) -> anyhow::Result<()> {
    if !input.is_file() {
        anyhow::bail!("Corpus table not found: {}", input.display());
    }

    let start = Instant::now();
    let rows = export::csv::read_corpus(input)?;
    let features = pipeline::run_from_corpus(config, rows)?;

    write_outputs(&features, output)?;

    if output.json {
        let summary = export::json::features_json(&features);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_features_table(&features, start.elapsed());
    }
    Ok(())
}

fn cmd_config(config: &Config, save: bool) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    eprintln!(
        "Log file: {}",
        spamprep::config::log_file_path(config).display()
    );
    if save {
        let path = spamprep::config::save_config(config)?;
        eprintln!("Saved configuration to {}", path.display());
    }
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "spamprep", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_outputs(features: &FeatureOutput, output: &OutputArgs) -> anyhow::Result<()> {
    if let Some(ref path) = output.output {
        create_parent(path)?;
        export::csv::write_feature_table(&features.corpus, &features.matrix, path)?;
    }
    if let Some(ref path) = output.ranked_output {
        create_parent(path)?;
        export::json::write_ranked(&features.ranked, path)?;
    }
    Ok(())
}

fn print_assembly_table(report: &AssemblyReport) {
    use humansize::{format_size, BINARY};

    println!();
    for label in [Label::Ham, Label::Spam] {
        println!(
            "  {:<25} {} files, {} parsed",
            format!("{label}"),
            report.files(label),
            report.rows(label)
        );
    }
    println!("  {:<25} {}", "Bytes read", format_size(report.bytes_read, BINARY));
    println!("  {:<25} {}", "Skipped files", report.skipped.len());
    for skipped in &report.skipped {
        println!("    {}  ({})", skipped.path.display(), skipped.reason);
    }
}

fn print_cleaning_table(report: &CleaningReport) {
    println!();
    println!(
        "  {:<25} {} -> {}",
        "Missing values",
        report.missing_before,
        report.missing_after
    );
    println!(
        "  {:<25} {} -> {}",
        "Duplicate rows",
        report.duplicates_before,
        report.duplicates_after
    );
    println!(
        "  {:<25} {} -> {}",
        "Rows",
        report.rows_before,
        report.rows_after
    );
}

fn print_features_table(features: &FeatureOutput, elapsed: std::time::Duration) {
    print_cleaning_table(&features.cleaning);
    println!(
        "  {:<25} {} x {}",
        "Feature matrix",
        features.matrix.n_rows(),
        features.matrix.n_cols()
    );
    println!("  {:<25} {:.2?}", "Elapsed", elapsed);
    print_ranked(&features.ranked);
}

fn print_ranked(ranked: &[RankedFeature]) {
    if ranked.is_empty() {
        println!();
        return;
    }
    println!();
    println!("  Top {} features:", ranked.len());
    for (i, feature) in ranked.iter().enumerate() {
        println!("    {:>3}  {:<24} {:.6}", i + 1, feature.term, feature.mean_weight);
    }
    println!();
}
