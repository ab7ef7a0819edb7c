use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use pathview_cli::cli::Args;
use pathview_cli::ThumbnailBatch;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = args.to_config().context("invalid configuration")?;
    info!("path {}", args.path.display());
    info!("file name ending {}{}", config.suffix, config.extension);

    let batch = ThumbnailBatch::new(config);
    let report = batch
        .run(&args.path, args.opath.as_deref())
        .with_context(|| format!("failed to render sessions in {}", args.path.display()))?;

    if !report.passed() {
        for failure in report.failures() {
            error!(
                "{}: {}",
                failure.session,
                failure.error.as_deref().unwrap_or("unknown error")
            );
        }
        std::process::exit(1);
    }

    Ok(())
}
