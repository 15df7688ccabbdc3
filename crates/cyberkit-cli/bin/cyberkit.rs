//! CyberKit binary entry point.
//!
//! Parses the command line, installs logging on stderr and hands off to the
//! cyberkit-cli library. Command output goes to stdout.

use anyhow::Result;
use clap::Parser;
use cyberkit_cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut stdout = std::io::stdout();
    cyberkit_cli::run(cli, &mut stdout).await
}
