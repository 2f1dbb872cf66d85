//! idbench: compare primary-key strategies on MongoDB
//!
//! Runs every scenario for ObjectId, ULID and UUID identifiers against the
//! collection named by the environment, then prints a comparison table.
//!
//! Environment:
//! - `MONGO_URI` (required) connection string
//! - `IDBENCH_DATABASE` / `IDBENCH_COLLECTION` (default `perftest`)
//! - `RUST_LOG` log filter, default `info`; logs go to stderr

use std::process;
use std::time::{Duration, Instant};

use anyhow::Context;
use idbench::{format_duration, BenchmarkMatrix, MongoStore, Report, StoreConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        eprintln!("Error: {:?}", err);
        process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> anyhow::Result<()> {
    let started = Instant::now();

    let config = StoreConfig::from_env().context("reading store configuration")?;
    let store = MongoStore::connect(&config).context("connecting to the store")?;

    let outcome = BenchmarkMatrix::new(&store).run();
    store.close();
    let results = outcome.context("benchmark run aborted")?;

    info!(target: "idbench::main", scenarios = results.len(), "benchmark finished");
    let report = Report::build(results).context("building the comparison table")?;

    println!("{}", report);
    println!(
        "Total execution time: {}",
        format_duration(started.elapsed(), Duration::from_millis(1))
    );
    Ok(())
}
