use clap::Parser;
use snapkeeper::{cli::Cli, run::run};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error};

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.tracing_level_filter())
        .with_writer(io::stderr)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    debug!(cli = ?cli);

    match run(&cli, &mut io::stdout().lock()).await {
        Ok(code) => Ok(code),
        Err(err) if err.is_unauthorized() => {
            error!("the cloud API rejected the configured credentials");
            Err(err.into())
        }
        Err(err) => {
            error!(%err, "pass aborted");
            Err(err.into())
        }
    }
}
