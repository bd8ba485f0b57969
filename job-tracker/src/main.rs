use anyhow::Context;
use clap::Parser;
use job_tracker::{FileBlobStore, JobStore, TrackerConfig, WishlistStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

mod commands;

use commands::Command;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track job applications", long_about = None)]
struct Args {
    /// Config file, defaults to the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    log_file_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path.as_deref());

    let config = match &args.config {
        Some(path) => TrackerConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => {
            let (config, path) = TrackerConfig::load().context("Failed to load config")?;
            tracing::debug!("Using config at {:?}", path);
            config
        }
    };

    let data_dir = config.data_dir();
    let blob = Arc::new(
        FileBlobStore::new(&data_dir)
            .with_context(|| format!("Failed to open data directory {:?}", data_dir))?,
    );
    tracing::debug!("Local data stored in {:?}", blob.dir());

    let jobs = JobStore::open(blob.clone())
        .context("Failed to restore jobs")?
        .with_load_timeout(config.load_timeout());
    let wishlist = WishlistStore::open(blob).context("Failed to restore wishlist")?;

    let mut session = commands::Session {
        config,
        jobs,
        wishlist,
    };

    commands::run(&mut session, args.command).await
}

fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("job-tracker.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
