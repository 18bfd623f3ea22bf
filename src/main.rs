use clap::Parser;
use grid_forecast::cli::{run, Cli};
use grid_forecast::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
