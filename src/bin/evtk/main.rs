//! # evtk
//!
//! Command-line front end: writes the example datasets and `.pvd` collections.
//!
//! ```bash
//! # Rectilinear grid with point and cell data -> out/rect.vtr
//! evtk demo rectilinear out/rect
//!
//! # Index a time series -> out/series.pvd
//! evtk group out/series out/step_0.vtu out/step_1.vtu --dt 0.5
//! ```

mod demo;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use evtk::VtkGroup;

use demo::DemoKind;

/// evtk - VTK XML writer with raw appended binary data
#[derive(Parser)]
#[command(name = "evtk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one of the example datasets
    Demo {
        /// Dataset to write
        #[arg(value_enum)]
        kind: DemoKind,

        /// Output path without extension
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Write a .pvd collection over existing dataset files
    Group {
        /// Output path without extension
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Dataset files, in time order
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Simulation time between consecutive files
        #[arg(long, default_value_t = 1.0)]
        dt: f64,

        /// Group name written for every dataset
        #[arg(long, default_value = "")]
        group: String,
    },

    /// Print the library version and build stamp
    Version,
}

/// Install the fmt subscriber. `-v`/`-q` take precedence over `RUST_LOG`.
fn init_logging(verbose: u8, quiet: bool) {
    let filter = match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        (false, 1) => EnvFilter::new("debug"),
        (false, _) => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Demo { kind, output } => {
            let path = demo::run(kind, &output)
                .with_context(|| format!("failed to write {kind:?} demo to {}", output.display()))?;
            info!("wrote {}", path.display());
        }
        Commands::Group { output, files, dt, group } => {
            let mut pvd = VtkGroup::create(&output)
                .with_context(|| format!("failed to create collection {}", output.display()))?;
            for (i, file) in files.iter().enumerate() {
                pvd.add_file(file, i as f64 * dt, &group, 0)?;
            }
            let path = pvd.save()?;
            info!(datasets = files.len(), "wrote {}", path.display());
        }
        Commands::Version => println!("{}", evtk::version_string()),
    }

    Ok(())
}
