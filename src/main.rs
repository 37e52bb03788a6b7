//! Generates the built-in catalog's test expressions and prints them as JSON lines.
//!
//! Usage: `concord [settings-file]`. Settings come from the optional file and
//! `CONCORD__*` environment variables, logging from `RUST_LOG` or `log_filter`.
//! When a persistence path is configured the run is stored and compared with
//! the previous run of the same seed.

use std::io::Write;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use concord::generator::ExpressionGenerator;
use concord::interface::GenerationInterface;
use concord::operations::standard_catalog;
use concord::persist::{PersistenceMode, Persistor};
use concord::pool::StaticValuePool;
use concord::report::GenerationReport;
use concord::selector::select;
use concord::settings::Settings;
use concord::{ConcordError, Result};

fn run(settings: &Settings) -> Result<()> {
    let catalog = standard_catalog()?;
    let selection = select(&catalog, &settings.selection);
    info!(
        descriptors = catalog.len(),
        selected = selection.len(),
        complexity = %settings.workload.complexity,
        scenario = %settings.workload.scenario,
        "catalog ready"
    );

    let pool = StaticValuePool::standard();
    let config = settings.generation.generator();
    let report: GenerationReport = if settings.generation.shards > 1 {
        GenerationInterface::new(&pool, config, settings.generation.shards).run(&selection)?
    } else {
        ExpressionGenerator::new(&pool, config).generate(&selection)?
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.to_json_lines()?.as_bytes())
        .map_err(|e| ConcordError::Serialization(e.to_string()))?;
    eprint!("{report}");

    if let Some(path) = &settings.persistence.path {
        let mut persistor = Persistor::new(PersistenceMode::File(path.clone()))?;
        let previous = persistor.latest_run(report.seed)?;
        let run = persistor.persist_run(&catalog, &report)?;
        if let Some(previous) = previous {
            if previous.digest == report.digest() {
                info!(%run, previous = %previous.run, "identical to previous run");
            } else {
                let diff = persistor.diff_runs(previous.run, run)?;
                warn!(
                    %run,
                    previous = %previous.run,
                    removed = diff.only_in_first.len(),
                    added = diff.only_in_second.len(),
                    "expressions differ from previous run"
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let path = std::env::args().nth(1);
    let settings = match Settings::load(path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "generation failed");
            ExitCode::FAILURE
        }
    }
}
