// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-plan document checker
//!
//! Validates a document against a catalog export, prints the report and
//! optionally writes the normalized document.
//!
//! # Usage
//!
//! ```bash
//! # Check a document, every catalog reference will be unresolved
//! floorplan-check plan.json
//!
//! # Resolve against a catalog export, fail on any error, keep the canonical form
//! floorplan-check plan.json --catalog catalog.json --strict --output plan.normalized.json
//!
//! # Machine-readable report
//! floorplan-check plan.json --format json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use floorplan_engine::{ConsistencyChecker, InMemoryCatalog, Outcome, ValidationOptions};
use log::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Floor-plan document checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Document to check
    document: PathBuf,

    /// Catalog export (components, material variants, room styles, ...)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Validation options as JSON; missing fields keep their defaults
    #[arg(long)]
    options: Option<PathBuf>,

    /// Fail on any error finding, not only on rejection
    #[arg(long)]
    strict: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Write the normalized document here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Spell out registry defaults for absent fields in the normalized document
    #[arg(long)]
    fill_defaults: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn read(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}: {}", what, path.display()))
}

fn load_options(args: &Args) -> anyhow::Result<ValidationOptions> {
    let options = match &args.options {
        Some(path) => serde_json::from_str(&read(path, "options")?)
            .with_context(|| format!("Invalid options file: {}", path.display()))?,
        None => ValidationOptions::default(),
    };
    let options = if args.strict { options.with_strict(true) } else { options };
    Ok(if args.fill_defaults { options.with_fill_defaults(true) } else { options })
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<InMemoryCatalog> {
    match path {
        Some(path) => InMemoryCatalog::from_json(&read(path, "catalog")?)
            .with_context(|| format!("Invalid catalog file: {}", path.display())),
        None => Ok(InMemoryCatalog::new()),
    }
}

fn print_report(outcome: &Outcome, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            let report = serde_json::json!({
                "stage": outcome.stage.name(),
                "findings": outcome.report,
                "references": outcome.references,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Format::Text => {
            for finding in outcome.report.findings() {
                println!("{}", finding);
            }
            println!(
                "{}: {} errors, {} warnings",
                outcome.stage,
                outcome.report.error_count(),
                outcome.report.warnings().count()
            );
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = load_options(&args)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    info!("Catalog loaded: {} ids", catalog.len());

    let json = read(&args.document, "document")?;
    let checker = ConsistencyChecker::with_options(&catalog, options);
    let outcome = checker
        .check_str(&json)
        .await
        .with_context(|| format!("Failed to check {}", args.document.display()))?;

    print_report(&outcome, args.format)?;

    if let (Some(path), Some(document)) = (&args.output, &outcome.document) {
        let normalized = serde_json::to_string_pretty(document)?;
        std::fs::write(path, normalized)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Normalized document written to {}", path.display());
    }

    Ok(if outcome.passes(checker.options().strict) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
