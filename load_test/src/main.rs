use anyhow::Result;
use clap::Parser;

use weather_load_test::cli::{Cli, Mode};
use weather_load_test::commands;

fn init_tracing(verbose: bool) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let exit_code = match cli.mode {
        Mode::Run(args) => {
            init_tracing(args.verbose)?;
            commands::run_load_test(args).await?
        }
        Mode::Probe(args) => {
            init_tracing(args.verbose)?;
            commands::run_probe(args).await?
        }
    };

    std::process::exit(exit_code);
}
