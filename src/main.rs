//! Respite - a focus timer with randomized micro-break prompts
//!
//! Work/break cycles in the Pomodoro tradition, plus short randomized
//! micro-breaks during work intervals. A daemon owns the timer; this
//! binary doubles as the daemon and its control CLI.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use respite::cli::{Cli, Commands, Display, IpcClient};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Start(args)) => {
            let client = IpcClient::new()?;
            let response = client.start(args.to_params()).await?;
            Display::show_action(&response);
        }
        Some(Commands::Stop) => {
            let client = IpcClient::new()?;
            let response = client.stop().await?;
            Display::show_action(&response);
        }
        Some(Commands::Reset) => {
            let client = IpcClient::new()?;
            let response = client.reset().await?;
            Display::show_action(&response);
        }
        Some(Commands::Status) => {
            let client = IpcClient::new()?;
            let response = client.status().await?;
            Display::show_status(&response);
        }
        Some(Commands::Stats { days }) => {
            let client = IpcClient::new()?;
            let response = client.stats(days).await?;
            Display::show_stats(&response);
        }
        Some(Commands::Config(args)) => {
            let client = IpcClient::new()?;
            let response = client.config(args.to_params()).await?;
            Display::show_config(&response);
        }
        Some(Commands::Daemon) => {
            respite::daemon::run().await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
