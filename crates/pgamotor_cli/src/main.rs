//! Command-line tool for evaluating and validating motor-based scenes.

mod cli;
mod scene;

fn main() -> eyre::Result<()> {
    use clap::Parser;

    let args = cli::Args::parse();

    // Initialize logging.
    env_logger::builder().init();
    color_eyre::install()?;

    cli::exec(args.subcommand)
}
