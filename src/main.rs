// ==============================================================================
// main.rs - VEP Variant Filter Entry Point
// ==============================================================================
// Description: Filters VEP JSON output into a tab-separated variant report
// Author: Matt Barham
// Created: 2026-10-17
// Modified: 2026-10-17
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vep_filter::config::{FilterConfig, FrequencyPolicy, DEFAULT_MAX_FREQUENCY};
use vep_filter::output::{self, OutputFormat};
use vep_filter::{VariantFilter, VepParser};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// VEP JSON output file (plain or gzip-compressed)
    json_file: PathBuf,

    /// Phenotype annotation sources to report (repeatable)
    #[arg(long = "source", env = "VEP_FILTER_SOURCES", value_delimiter = ',', default_value = "MIM_morbid")]
    sources: Vec<String>,

    /// Maximum gnomAD exome frequency for a colocated variant to count as rare
    #[arg(long, env = "VEP_FILTER_MAX_FREQUENCY", default_value_t = DEFAULT_MAX_FREQUENCY)]
    max_frequency: f64,

    /// Colocated variant policy (last-wins or any-common-rejects)
    #[arg(long, default_value = "last-wins")]
    frequency_policy: FrequencyPolicy,

    /// Report format (tsv or json)
    #[arg(long, default_value = "tsv")]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vep_filter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    debug!("Arguments: {:?}", args);

    let config = FilterConfig::new(args.sources, args.max_frequency, args.frequency_policy)
        .context("Invalid filter configuration")?;
    info!(
        "Sources: {:?}, max frequency: {}, policy: {}",
        config.annotation_sources,
        config.max_frequency,
        config.frequency_policy.as_str()
    );

    info!("Loading VEP annotations from {:?}", args.json_file);
    let records = VepParser::parse(&args.json_file)
        .with_context(|| format!("Failed to load {}", args.json_file.display()))?;

    let filter = VariantFilter::new(config);
    let rows = filter
        .select(&records)
        .context("Failed to filter variant records")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            output::write_report(&mut writer, &rows, args.format)
                .context("Failed to write report")?;
            writer.flush()?;
            info!("Report written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            output::write_report(stdout.lock(), &rows, args.format)
                .context("Failed to write report")?;
        }
    }

    Ok(())
}
