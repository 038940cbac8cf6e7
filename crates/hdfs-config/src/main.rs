//! # hdfs-config
//!
//! Prints the HDFS client configuration derived from a settings file,
//! generates default settings, and validates settings before deployment.
//! Logs go to stderr so the derived configuration can be piped.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hdfs_config::{ConfigLoader, ConfigValidation, HdfsConfigurationInitializer, HdfsSettings};

mod cli;

use cli::{Commands, HdfsConfigArgs, OutputFormat};

fn main() -> Result<()> {
    let args = HdfsConfigArgs::parse_args();

    init_logging(&args.log_level)?;

    match args.command {
        Commands::Derive {
            config,
            format,
            resources,
        } => run_derive(config, format, resources),
        Commands::GenConfig { output } => run_config_generation(output),
        Commands::Check { config } => run_check(config),
    }
}

fn run_derive(
    config_path: Option<PathBuf>,
    format: OutputFormat,
    resources: Vec<PathBuf>,
) -> Result<()> {
    let mut settings = load_settings(config_path)?;
    settings.resource_config_files.extend(resources);

    let initializer = HdfsConfigurationInitializer::new(&settings)
        .context("Failed to prepare HDFS configuration")?;
    let configuration = initializer
        .new_configuration()
        .context("Failed to derive HDFS configuration")?;

    info!("Derived {} configuration properties", configuration.len());

    match format {
        OutputFormat::Properties => print!("{}", configuration.to_properties_string()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&configuration)?),
    }

    Ok(())
}

fn run_config_generation(output: Option<PathBuf>) -> Result<()> {
    let toml_content = toml::to_string_pretty(&HdfsSettings::default())?;

    match output {
        Some(path) => {
            info!("Generating configuration file: {}", path.display());
            std::fs::write(&path, toml_content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Generated configuration file: {}", path.display());
        }
        None => print!("{toml_content}"),
    }

    Ok(())
}

fn run_check(config_path: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config_path)?;

    settings
        .validate()
        .context("Settings validation failed")?;
    for warning in settings.warnings() {
        warn!("{}", warning);
    }

    let initializer = HdfsConfigurationInitializer::new(&settings)
        .context("Failed to prepare HDFS configuration")?;

    eprintln!(
        "Configuration OK: {} resource file(s), {} base properties",
        settings.resource_config_files.len(),
        initializer.resources().len()
    );
    Ok(())
}

fn load_settings(config_path: Option<PathBuf>) -> Result<HdfsSettings> {
    let settings = HdfsSettings::load(config_path).context("Failed to load settings")?;
    Ok(settings)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
