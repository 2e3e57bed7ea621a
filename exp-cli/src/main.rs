//! Experiment lineage CLI tool

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;

#[derive(Parser)]
#[command(name = "explineage")]
#[command(author, version, about = "Experiment lineage resolution CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the lineage of a seed from an edge file
    Resolve {
        /// Path to the edge file (JSON)
        #[arg(long)]
        edges: String,

        /// LSID of the seed object
        #[arg(long)]
        seed: String,

        /// Expected row id of the seed; must match the row id the edge file declares for it
        #[arg(long)]
        row_id: Option<i64>,

        /// Maximum number of hops (0 uses the configured default)
        #[arg(long, default_value = "0")]
        depth: u32,

        /// Only walk towards parents
        #[arg(long, conflicts_with = "children_only")]
        parents_only: bool,

        /// Only walk towards children
        #[arg(long)]
        children_only: bool,

        /// Only follow edges recorded under this source key
        #[arg(long)]
        source_key: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: commands::resolve::OutputFormat,
    },

    /// Print the node kind of each identifier under the current configuration
    Classify {
        /// LSIDs to classify
        #[arg(required = true)]
        lsids: Vec<String>,
    },
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    let config = exp_core::LineageConfig::from_env()?;

    match cli.command {
        Commands::Resolve {
            edges,
            seed,
            row_id,
            depth,
            parents_only,
            children_only,
            source_key,
            format,
        } => {
            let request = commands::resolve::ResolveRequest {
                edges_path: edges,
                seed,
                row_id,
                depth,
                parents_only,
                children_only,
                source_key,
                format,
            };
            let output = commands::resolve::execute(&config, &request)?;
            println!("{}", output);
        }
        Commands::Classify { lsids } => {
            for line in commands::classify::execute(&config, &lsids)? {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
