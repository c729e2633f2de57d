//! dnc-hull CLI entry point

use anyhow::Result;
use clap::Parser;

use dnc_hull_cli::{execute, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}
