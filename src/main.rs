//! gray-config: watch a config feed and report values and gray decisions.
//!
//! Either resolves the watch target through the config manager
//! (`--app`/`--manager`, or settings/environment) or watches a local file
//! directly (`--feed-dir` + `--key`). Every `--interval-secs` it logs the
//! `--show` values and `--gray` decisions until interrupted.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use gray_config::bootstrap::{HttpBootstrap, WatchTarget};
use gray_config::lifecycle::{wait_for_shutdown, ConfigClient};
use gray_config::observability::{logging, metrics};
use gray_config::settings::load_settings;
use gray_config::watch::FileFeed;

#[derive(Parser)]
#[command(name = "gray-config")]
#[command(about = "Runtime config client with gray-release checks", long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Application name to resolve at the manager.
    #[arg(long)]
    app: Option<String>,

    /// Config manager endpoint.
    #[arg(long)]
    manager: Option<String>,

    /// Directory to watch instead of bootstrapping (repeatable).
    #[arg(long = "feed-dir")]
    feed_dirs: Vec<PathBuf>,

    /// Watch key (file path relative to a feed dir).
    #[arg(long)]
    key: Option<String>,

    /// Config name to print, as namespace.key (repeatable).
    #[arg(long = "show")]
    show: Vec<String>,

    /// Gray check to print, as namespace.key:id (repeatable).
    #[arg(long = "gray")]
    gray: Vec<String>,

    /// Seconds between reports.
    #[arg(long, default_value_t = 5)]
    interval_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.settings.as_deref())?;
    if cli.app.is_some() {
        settings.app = cli.app.clone();
    }
    if cli.manager.is_some() {
        settings.manager_endpoint = cli.manager.clone();
    }

    logging::init_logging(&settings.observability.log_filter)?;
    tracing::info!("gray-config v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = ConfigClient::new();
    let backoff = settings.watch.backoff();

    match (cli.feed_dirs.is_empty(), cli.key.clone()) {
        (false, Some(key)) => {
            let endpoints = cli.feed_dirs.iter().map(|d| d.display().to_string()).collect();
            let _session = client.start_watch(FileFeed::new(), WatchTarget::new(endpoints, key), backoff);
        }
        _ => {
            let manager = settings
                .manager_endpoint
                .as_deref()
                .ok_or("no manager endpoint configured (use --manager or --feed-dir/--key)")?;
            let bootstrap = HttpBootstrap::new(
                manager,
                &settings.bootstrap.path,
                settings.bootstrap.timeout(),
            )?;
            let app = settings.app.clone().unwrap_or_default();
            let _session = client.init(&app, &bootstrap, FileFeed::new(), backoff).await?;
        }
    }

    let gray_checks: Vec<(String, String)> = cli
        .gray
        .iter()
        .filter_map(|check| match check.rsplit_once(':') {
            Some((name, id)) => Some((name.to_string(), id.to_string())),
            None => {
                tracing::warn!(check = %check, "Ignoring gray check without ':<id>'");
                None
            }
        })
        .collect();

    let mut ticker = tokio::time::interval(Duration::from_secs(cli.interval_secs.max(1)));
    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                report(&client, &cli.show, &gray_checks);
            }
            _ = &mut shutdown => break,
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn report(client: &ConfigClient, show: &[String], gray_checks: &[(String, String)]) {
    tracing::info!(
        state = ?client.status().state(),
        entries = client.store().len(),
        reloads = client.status().reloads(),
        "Client status"
    );

    for name in show {
        let value = client.store().get_by_name(name);
        tracing::info!(name = %name, value = value.as_deref().unwrap_or("<unset>"), "Config value");
    }

    for (name, id) in gray_checks {
        // Numeric ids bucket on their value, others on their hash
        let allowed = match id.parse::<i64>() {
            Ok(n) => client.gray().is_allowed_id(name, n),
            Err(_) => client.gray().is_allowed(name, id),
        };
        tracing::info!(name = %name, id = %id, allowed, "Gray check");
    }
}
