//! davsync - mirror a local directory onto a WebDAV server.
//!
//! Reads `webdav.json` (or the file given with `--config`), watches the
//! configured directory and pushes every change to the server until
//! interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use davsync_core::{
    DEFAULT_CONFIG_FILE, DesktopNotifier, Dispatcher, LogNotifier, Mirror, MirrorConfig,
    MirrorError, NotificationSink, RootPair,
};
use davsync_dav_client::WebDavClient;
use davsync_watcher::{ExclusionFilter, WatchRegistry, channel_watcher};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(name = "davsync")]
#[clap(about = "Mirror a local directory onto a WebDAV server", long_about = None)]
struct Args {
    /// Path to the JSON settings file
    #[clap(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = MirrorConfig::load(&args.config)
        .map_err(MirrorError::from)
        .with_context(|| format!("fatal error in config file {}", args.config.display()))?;
    debug!("Loaded {config:?}");

    let sink: Arc<dyn NotificationSink> = if config.notifications {
        Arc::new(DesktopNotifier)
    } else {
        Arc::new(LogNotifier)
    };

    run(config, sink).await
}

async fn run(config: MirrorConfig, sink: Arc<dyn NotificationSink>) -> anyhow::Result<()> {
    let client = WebDavClient::new(&config.server, &config.username, &config.password)
        .map_err(MirrorError::from)?;
    info!("Remote store at {}", client.base_url());

    let (watcher, events) = channel_watcher().map_err(MirrorError::from)?;
    let registry = WatchRegistry::new(watcher, ExclusionFilter::new(config.exclusions))
        .with_created_exclusion(config.exclude_created_directories);

    let mut mirror = Mirror::new(
        RootPair::new(&config.local_path, &config.server_path),
        registry,
        Dispatcher::new(client, sink),
    );
    mirror.seed();

    tokio::select! {
        () = mirror.run(events) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for interrupt")?;
            info!("Interrupted, stopping");
        }
    }
    Ok(())
}
