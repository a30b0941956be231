use clap::Parser;
use energy_emissions::cli::{run, Cli};
use energy_emissions::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
