//! Builds the registry artifacts for the hookagain site.
//!
//! Validates `registry.json`, writes `<public>/<name>.json` for every hook,
//! regenerates `<public>/index.json` and the lookup module. Exits 1 with the
//! error chain on stderr when validation or any build step fails. `--check`
//! stops after validation.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hookagain_registry::{
    BuildLayout, RegistrySchemas, find_repo_root, layout, load_registry, run_build,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "build-registry", version, about = "Build the hookagain registry artifacts")]
struct Cli {
    /// Repository root (directory holding registry.json and registry/)
    #[arg(long, env = "REGISTRY_ROOT")]
    root: Option<PathBuf>,

    /// Registry definition, relative to the root
    #[arg(long, default_value = layout::REGISTRY_FILE)]
    registry: PathBuf,

    /// Registry JSON Schema to validate against instead of the bundled one
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Output directory for index.json and per-item catalog files
    #[arg(long, env = "REGISTRY_PUBLIC_DIR", default_value = layout::DEFAULT_PUBLIC_DIR)]
    public_dir: PathBuf,

    /// Output directory for the generated lookup module
    #[arg(long, env = "REGISTRY_MODULE_DIR", default_value = layout::DEFAULT_MODULE_DIR)]
    module_dir: PathBuf,

    /// Extension of the generated lookup module (ts, tsx, js, jsx, mjs)
    #[arg(long, env = "REGISTRY_MODULE_EXT", default_value = layout::DEFAULT_MODULE_EXT)]
    module_ext: String,

    /// Validate the registry and exit without writing anything
    #[arg(long)]
    check: bool,

    /// Log level; RUST_LOG takes precedence when set
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => find_repo_root()?,
    };
    let layout = BuildLayout::from_root(root)
        .with_registry_file(&cli.registry)
        .with_public_dir(&cli.public_dir)
        .with_module_dir(&cli.module_dir)
        .with_module_ext(&cli.module_ext);

    let schemas = match &cli.schema {
        Some(path) => RegistrySchemas::load(&layout.resolve(path))?,
        None => RegistrySchemas::bundled().context("loading bundled registry schema")?,
    };

    if cli.check {
        let registry = load_registry(&layout, &schemas)?;
        info!(
            items = registry.len(),
            catalogued = registry.catalogued().count(),
            "registry is valid"
        );
        return Ok(());
    }

    run_build(&layout, &schemas)?;
    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides `--log-level`.
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
