use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Debug, Parser)]
#[command(
    name = "itax",
    version,
    about = "Calculate Indian income tax under the old and new regimes"
)]
struct Opts {
    /// JSON tax table to use instead of the built-in rates
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute liability under one regime
    Compute(cmd::compute::ComputeCommand),
    /// Compute both regimes and recommend the cheaper one
    Compare(cmd::compare::CompareCommand),
    /// Compare regimes for every row of a CSV file
    Batch(cmd::batch::BatchCommand),
    /// Show the slabs, rebate and surcharge for an assessment year
    Slabs(cmd::slabs::SlabsCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let table = cmd::load_table(opts.config.as_deref())?;

    match opts.command {
        Command::Compute(compute) => compute.exec(&table),
        Command::Compare(compare) => compare.exec(&table),
        Command::Batch(batch) => batch.exec(&table),
        Command::Slabs(slabs) => slabs.exec(&table),
        Command::Schema(schema) => schema.exec(),
    }
}
