use anyhow::Result;
use clap::Parser;

use antigen::args::Args;
use antigen::runner::Runner;

fn main() -> Result<()> {
    let args = Args::parse();
    let runner = Runner::new(args)?;
    runner.start()
}
