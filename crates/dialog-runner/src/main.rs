use anyhow::{Context, Result};
use clap::Parser;
use dialog_runner::{run, shutdown::shutdown_signal, Cli};
use dotenvy::dotenv;
use tracing::{info, subscriber};
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "info,dialog_flow=debug,dialog_anim=info,dialog_runner=debug";

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    subscriber::set_global_default(subscriber)
        .context("Failed to set global default tracing subscriber")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file in the current directory.
    dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    info!("[dialog-runner] Visualizing {}", cli.log.display());

    let summary = run(&cli, shutdown_signal()).await?;
    match &summary.video {
        Some(video) => println!(
            "✅ {} messages, {} captions, {} frames -> {}",
            summary.messages,
            summary.speeches,
            summary.frames,
            video.display()
        ),
        None => println!(
            "✅ {} messages, {} captions, {} frames",
            summary.messages, summary.speeches, summary.frames
        ),
    }
    Ok(())
}
