//! Builds a skipset from the command line, then searches and deletes keys,
//! printing the level structure along the way.

use anyhow::{Context, Result};
use clap::Parser;
use skipset::{DEFAULT_MAX_LEVEL, DEFAULT_P, SkipSet};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skipset-demo")]
#[command(about = "Insert, search and delete keys in a skip list.", long_about = None)]
struct Cli {
    /// Highest level a node may be assigned.
    #[arg(long, default_value_t = DEFAULT_MAX_LEVEL)]
    max_level: usize,
    /// Probability that a node is promoted to the next level.
    #[arg(long, default_value_t = DEFAULT_P)]
    p: f64,
    /// Seed for the level generator. If omitted, levels differ on every run.
    #[arg(long)]
    seed: Option<u64>,
    /// Keys to insert, in order.
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "3,6,7,9,12,19,17,26,21,25"
    )]
    insert: Vec<i64>,
    /// Keys to search for after inserting.
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "19,15,21"
    )]
    search: Vec<i64>,
    /// Keys to delete after searching.
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "17"
    )]
    delete: Vec<i64>,
    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut skipset = match cli.seed {
        Some(seed) => SkipSet::seeded(cli.max_level, cli.p, seed),
        None => SkipSet::with_config(cli.max_level, cli.p),
    }
    .with_context(|| {
        format!(
            "invalid skip list configuration (max level {}, p {})",
            cli.max_level, cli.p
        )
    })?;
    info!(max_level = cli.max_level, p = cli.p, seed = ?cli.seed, "created skip list");

    for &key in &cli.insert {
        if !skipset.insert(key) {
            debug!(key, "duplicate key ignored");
        }
    }

    println!("SkipList structure:");
    println!("{skipset}");

    println!("\nSearch results:");
    for &key in &cli.search {
        let found = if skipset.search(key) { "Found" } else { "Not found" };
        println!("Search for {key}: {found}");
    }

    for &key in &cli.delete {
        if !skipset.delete(key) {
            debug!(key, "key to delete was absent");
        }
        println!("\nAfter deleting {key}:");
        println!("{skipset}");
    }

    Ok(())
}
