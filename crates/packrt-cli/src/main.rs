use anyhow::{bail, Context};
use clap::Parser;
use packrt_core::{
    bootstrap, BootstrapMode, CircularImportPolicy, CliOverrides, LoaderConfig, StdoutConsole,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod bundles;

/// packrt - run a bundled program through the module loader
#[derive(Parser, Debug, Clone)]
#[command(name = "packrt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Demo bundle to run (see --list)
    #[arg(short, long, value_name = "NAME", default_value = "two-module")]
    bundle: String,

    /// Entry module id (defaults to the bundle's entry)
    #[arg(short, long, value_name = "ID")]
    entry: Option<String>,

    /// Path to a packrt.json configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the entry module's exports as JSON after it runs
    #[arg(long)]
    expose: bool,

    /// Circular import policy (allow, warn, deny)
    #[arg(long, value_name = "POLICY")]
    circular: Option<String>,

    /// List the available demo bundles
    #[arg(long)]
    list: bool,

    /// Write a starter packrt.json to the current directory
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug to trace module instantiation
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.init {
        let path = Path::new("packrt.json");
        LoaderConfig::init_file(path).context("failed to write packrt.json")?;
        println!("Created {}", path.display());
        return Ok(());
    }

    if cli.list {
        for bundle in bundles::BUNDLES {
            println!("{:<12} {}", bundle.name, bundle.description);
        }
        return Ok(());
    }

    let Some(bundle) = bundles::find(&cli.bundle) else {
        bail!("unknown bundle '{}' (use --list)", cli.bundle);
    };

    let config = load_config(&cli, bundle.entry)?;
    debug!(?config, "resolved configuration");
    info!(bundle = bundle.name, "running bundle");

    let registry = (bundle.build)(Arc::new(StdoutConsole::new()))?;
    let startup = bootstrap(registry, &config)?;

    if let Some(exports) = startup.exports() {
        println!("{}", serde_json::to_string_pretty(&exports.to_json())?);
    }

    Ok(())
}

fn load_config(cli: &Cli, default_entry: &str) -> anyhow::Result<LoaderConfig> {
    let mut config = match &cli.config {
        Some(path) => LoaderConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => LoaderConfig::default(),
    };

    let circular_imports = cli
        .circular
        .as_deref()
        .map(str::parse::<CircularImportPolicy>)
        .transpose()?;

    config.merge_with_cli(CliOverrides {
        entry: cli.entry.clone(),
        bootstrap: cli.expose.then_some(BootstrapMode::Expose),
        circular_imports,
    });

    if config.entry.is_none() {
        config.entry = Some(default_entry.to_string());
    }

    Ok(config)
}
