use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, error, info};

use scorigami::grid::{GridConfig, SCORE_FLOOR};
use scorigami::pipeline::{process, DEFAULT_INPUT, DEFAULT_OUTPUT};
use scorigami::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// where to write the JSON grid to
    out: Option<PathBuf>,

    /// games dataset to read
    input: Option<PathBuf>,

    /// lowest score represented in the grid
    #[clap(short = 'f', long, default_value_t = SCORE_FLOOR)]
    floor: u32,

    /// print a summary of the generated grid
    #[clap(short = 's', long)]
    summary: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if let (Some(out), Some(input)) = (&self.out, &self.input) {
            if out == input {
                bail!("output file must differ from the input file");
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let input = args.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let out = args.out.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let config = GridConfig { floor: args.floor };
    let report = process(&input, &out, &config).map_err(|err| {
        error!("processing failed: {err}");
        err
    })?;

    if args.summary {
        info!(
            "summary:\n{}",
            Console::default().render(&print::tabulate_summary(&report))
        );
    }
    Ok(())
}
