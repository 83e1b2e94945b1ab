use clap::{Parser, Subcommand};

use crate::cmd::*;

mod args;

/// Measures the throughput of Tessera's bit buffers and packers.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    /// The selected benchmark.
    #[clap(subcommand)]
    pub command: BenchCommand,

    #[clap(flatten)]
    pub verbosity: args::Verbosity,
}

/// The benchmarks supported by the harness.
#[derive(Debug, Subcommand)]
pub enum BenchCommand {
    Write(write::Write),
    Pack(pack::Pack),
}

impl Command for BenchCommand {
    fn handle(self) -> eyre::Result<()> {
        match self {
            Self::Write(write) => write.handle(),
            Self::Pack(pack) => pack.handle(),
        }
    }
}
