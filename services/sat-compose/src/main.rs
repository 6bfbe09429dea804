//! Satellite composite command-line tool.
//!
//! Inspects ATMS level-1b granules and runs spectral-blend composites
//! defined in YAML over the datasets of a granule. Results are printed to
//! stdout as JSON; logs go to stderr.

mod summary;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use compositor::CompositeConfig;
use l1b_reader::{silence_hdf5_errors, AtmsL1bReader, DatasetId, FileTypeInfo};
use sat_common::{attrs::to_json, Attributes};
use summary::ArraySummary;

#[derive(Parser, Debug)]
#[command(name = "sat-compose")]
#[command(about = "Inspect ATMS level-1b files and run spectral composites")]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", env = "SAT_COMPOSE_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print file metadata and the datasets a granule provides
    Inspect {
        /// Level-1b NetCDF file
        file: PathBuf,

        /// Variable holding the antenna temperature cube
        #[arg(long, default_value = "antenna_temp")]
        antenna_temperature: String,
    },

    /// Print one dataset of a granule
    Dataset {
        /// Level-1b NetCDF file
        file: PathBuf,

        /// Dataset name, e.g. "1" or "lat"
        #[arg(short, long)]
        name: String,

        #[arg(long, default_value = "antenna_temp")]
        antenna_temperature: String,
    },

    /// List composites in a definitions file
    ListComposites {
        /// Composite definitions (YAML)
        #[arg(short, long, env = "SAT_COMPOSE_COMPOSITES")]
        composites: PathBuf,
    },

    /// Run a composite over the datasets of a granule
    Composite {
        /// Level-1b NetCDF file
        file: PathBuf,

        /// Composite definitions (YAML)
        #[arg(short, long, env = "SAT_COMPOSE_COMPOSITES")]
        composites: PathBuf,

        /// Composite to run
        #[arg(short, long)]
        name: String,

        #[arg(long, default_value = "antenna_temp")]
        antenna_temperature: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level, args.json_logs)?;
    silence_hdf5_errors();

    let output = match args.command {
        Command::Inspect {
            file,
            antenna_temperature,
        } => inspect(&file, antenna_temperature)?,
        Command::Dataset {
            file,
            name,
            antenna_temperature,
        } => dataset(&file, &name, antenna_temperature)?,
        Command::ListComposites { composites } => list_composites(&composites)?,
        Command::Composite {
            file,
            composites,
            name,
            antenna_temperature,
        } => composite(&file, &composites, &name, antenna_temperature)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn open_reader(file: &Path, antenna_temperature: String) -> Result<AtmsL1bReader> {
    AtmsL1bReader::open(
        file,
        Attributes::new(),
        FileTypeInfo {
            antenna_temperature,
        },
    )
    .with_context(|| format!("Failed to open level-1b file {}", file.display()))
}

fn inspect(file: &Path, antenna_temperature: String) -> Result<serde_json::Value> {
    let reader = open_reader(file, antenna_temperature)?;
    let datasets = reader.available_datasets();
    info!(file = %file.display(), datasets = datasets.len(), "Inspected granule");

    Ok(json!({
        "file": file.display().to_string(),
        "attrs": to_json(&reader.attrs()),
        "datasets": datasets,
    }))
}

fn dataset(file: &Path, name: &str, antenna_temperature: String) -> Result<serde_json::Value> {
    let reader = open_reader(file, antenna_temperature)?;
    let Some(data) = reader.get_dataset(&DatasetId::from(name), None)? else {
        bail!("Dataset '{}' not available in {}", name, file.display());
    };
    Ok(serde_json::to_value(ArraySummary::of(&data))?)
}

fn list_composites(composites: &Path) -> Result<serde_json::Value> {
    let config = CompositeConfig::from_path(composites)
        .with_context(|| format!("Failed to load composites from {}", composites.display()))?;

    let entries: Vec<_> = config
        .composites
        .iter()
        .map(|(name, definition)| {
            json!({
                "name": name,
                "compositor": definition.method.kind(),
                "prerequisites": definition.prerequisites,
            })
        })
        .collect();

    Ok(json!({
        "sensor_name": config.sensor_name,
        "composites": entries,
    }))
}

fn composite(
    file: &Path,
    composites: &Path,
    name: &str,
    antenna_temperature: String,
) -> Result<serde_json::Value> {
    let config = CompositeConfig::from_path(composites)
        .with_context(|| format!("Failed to load composites from {}", composites.display()))?;
    let definition = config.definition(name)?;
    let blender = definition.build(name)?;
    let reader = open_reader(file, antenna_temperature)?;

    let mut inputs = Vec::with_capacity(definition.prerequisites.len());
    for prerequisite in &definition.prerequisites {
        let data = reader
            .get_dataset(&DatasetId::from(prerequisite.as_str()), None)?
            .with_context(|| format!("Prerequisite '{}' not available", prerequisite))?;
        inputs.push(data);
    }

    let result = blender
        .call(&inputs, Attributes::new())
        .with_context(|| format!("Composite '{}' failed", name))?;
    info!(composite = %name, shape = ?result.shape(), "Generated composite");

    Ok(serde_json::to_value(ArraySummary::of(&result))?)
}
