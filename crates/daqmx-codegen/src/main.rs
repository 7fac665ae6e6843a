//! `daqmx-codegen` command-line entry point.
//!
//! ```bash
//! daqmx-codegen generate --config crates/daqmx/codegen.toml --out generated/
//! daqmx-codegen check --config crates/daqmx/codegen.toml --out generated/
//! daqmx-codegen validate --metadata crates/daqmx-metadata/catalog
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use daqmx_codegen::{CodegenConfig, Generator};
use daqmx_metadata::MetadataStore;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "daqmx-codegen")]
#[command(about = "Generate the NI-DAQmx façade from the metadata catalog", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write generated modules and copied files
    Generate {
        /// Generator config (codegen.toml)
        #[arg(long)]
        config: PathBuf,
        /// Output directory
        #[arg(long)]
        out: PathBuf,
        /// Catalog directory; the bundled catalog when omitted
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Regenerate in memory and report files that differ from --out
    Check {
        /// Generator config (codegen.toml)
        #[arg(long)]
        config: PathBuf,
        /// Directory holding previously generated output
        #[arg(long)]
        out: PathBuf,
        /// Catalog directory; the bundled catalog when omitted
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Load and validate the catalog, then print a per-class summary
    Validate {
        /// Catalog directory; the bundled catalog when omitted
        #[arg(long)]
        metadata: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Multi-line, colored
    Pretty,
    /// Single-line, no colors
    Compact,
    /// One JSON object per event
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = match format {
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}

fn load_store(metadata: Option<&Path>) -> Result<MetadataStore> {
    match metadata {
        Some(dir) => MetadataStore::from_dir(dir)
            .with_context(|| format!("failed to load catalog from {}", dir.display())),
        None => MetadataStore::bundled().context("failed to load the bundled catalog"),
    }
}

fn load_config(path: &Path) -> Result<CodegenConfig> {
    CodegenConfig::load(path).with_context(|| format!("invalid config {}", path.display()))
}

fn generate(config: &Path, out: &Path, metadata: Option<&Path>) -> Result<ExitCode> {
    let store = load_store(metadata)?;
    let config = load_config(config)?;
    let written = Generator::new(&store, &config)
        .write_to(out)
        .context("generation failed")?;
    for path in &written {
        info!(path = %path.display(), "wrote");
    }
    Ok(ExitCode::SUCCESS)
}

fn check(config: &Path, out: &Path, metadata: Option<&Path>) -> Result<ExitCode> {
    let store = load_store(metadata)?;
    let config = load_config(config)?;
    let drift = Generator::new(&store, &config)
        .check(out)
        .context("generation failed")?;
    if drift.is_empty() {
        info!(out = %out.display(), "generated output is up to date");
        return Ok(ExitCode::SUCCESS);
    }
    for file in &drift {
        error!(path = %file.path.display(), "generated output is stale");
        print!("{}", file.diff);
    }
    Ok(ExitCode::FAILURE)
}

fn validate(metadata: Option<&Path>) -> Result<ExitCode> {
    let store = load_store(metadata)?;

    let mut per_class: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for class in store.classes() {
        let own = store.attributes(&class.name).count();
        let visible = store.effective_attributes(&class.name).len();
        per_class.insert(&class.name, (own, visible));
    }

    println!("{:<24} {:>6} {:>8}", "class", "own", "visible");
    for (class, (own, visible)) in &per_class {
        println!("{class:<24} {own:>6} {visible:>8}");
    }
    println!();
    println!(
        "{} classes, {} attributes, {} enums, {} error codes, {} collections",
        per_class.len(),
        store.attribute_count(),
        store.enums().count(),
        store.errors().count(),
        store.collections().count()
    );
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Generate {
            config,
            out,
            metadata,
        } => generate(&config, &out, metadata.as_deref()),
        Commands::Check {
            config,
            out,
            metadata,
        } => check(&config, &out, metadata.as_deref()),
        Commands::Validate { metadata } => validate(metadata.as_deref()),
    }
}
