//! rowmap CLI - materialize dataset files into typed records.

mod records;

use clap::{Parser, Subcommand};
use records::{Dto, Measurement, RecordKind};
use rowmap::{Cursor, DatasetConfig, MapError, Mapper, Record};
use serde::Serialize;
use std::fmt::Debug;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "rowmap")]
#[command(about = "Materialize dataset rows into typed records")]
#[command(version)]
struct Cli {
    /// Path to YAML dataset file
    #[arg(short, long, default_value = "dataset.yaml")]
    config: PathBuf,

    /// Output rows as JSON lines to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Materialize every row of the dataset
    Map {
        /// Record type to materialize into
        #[arg(long, value_enum)]
        record: RecordKind,

        /// Number of passes over the dataset, sharing one mapper
        #[arg(long, default_value = "1")]
        repeat: usize,
    },

    /// Show how a record binds to the dataset columns
    Inspect {
        /// Record type to bind
        #[arg(long, value_enum)]
        record: RecordKind,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), MapError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(MapError::Config)?;

    let dataset = DatasetConfig::load(&cli.config)?;
    info!(
        "Loaded dataset from {:?} ({} columns, {} rows)",
        cli.config,
        dataset.columns.len(),
        dataset.rows.len()
    );

    let mapper = Mapper::new();

    match cli.command {
        Commands::Map { record, repeat } => match record {
            RecordKind::Dto => map::<Dto>(&mapper, &dataset, repeat, cli.output_json),
            RecordKind::Measurement => {
                map::<Measurement>(&mapper, &dataset, repeat, cli.output_json)
            }
        },
        Commands::Inspect { record } => match record {
            RecordKind::Dto => inspect::<Dto>(&mapper, &dataset, cli.output_json),
            RecordKind::Measurement => inspect::<Measurement>(&mapper, &dataset, cli.output_json),
        },
    }
}

/// Materialize the dataset `repeat` times and print the rows of the first pass.
fn map<T>(
    mapper: &Mapper,
    dataset: &DatasetConfig,
    repeat: usize,
    output_json: bool,
) -> Result<(), MapError>
where
    T: Record + Default + Serialize + Debug,
{
    let mut total = 0u64;
    for pass in 0..repeat.max(1) {
        let rows = mapper.materialize_default::<T, _>(dataset.to_cursor()?)?;
        for row in rows {
            let row = row?;
            total += 1;
            if pass > 0 {
                continue;
            }
            if output_json {
                println!("{}", serde_json::to_string(&row)?);
            } else {
                println!("{:?}", row);
            }
        }
    }

    let stats = mapper.cache().stats();
    info!(
        "Materialized {} rows as {} ({} compilations, {} cache hits)",
        total,
        T::record_name(),
        stats.compilations,
        stats.hits
    );
    Ok(())
}

/// Print the bindings `T` would use against the dataset.
fn inspect<T: Record>(
    mapper: &Mapper,
    dataset: &DatasetConfig,
    output_json: bool,
) -> Result<(), MapError> {
    let cursor = dataset.to_cursor()?;
    let probe = mapper.probe::<T>(&cursor)?;
    let materializer = mapper.resolve::<T>(&cursor)?;

    if output_json {
        let bindings: Vec<_> = probe
            .bindings
            .iter()
            .map(|b| {
                serde_json::json!({
                    "property": b.property_name,
                    "ordinal": b.ordinal,
                    "column": cursor.column_name(b.ordinal),
                    "type": b.column_type.to_string(),
                })
            })
            .collect();
        let report = serde_json::json!({
            "record": T::record_name(),
            "signature": probe.signature.to_string(),
            "fingerprint": probe.signature.fingerprint(),
            "steps": materializer.len(),
            "bindings": bindings,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Record: {}", T::record_name());
        println!("  Signature: {}", probe.signature);
        println!("  Fingerprint: {}", probe.signature.fingerprint());
        println!("  Bindings:");
        for b in &probe.bindings {
            println!(
                "    {} <- #{} {} ({})",
                b.property_name,
                b.ordinal,
                cursor.column_name(b.ordinal),
                b.column_type
            );
        }
    }
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("unknown verbosity '{}'", other)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("unknown log format '{}'", other)),
    }

    Ok(())
}
