use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use zonewatch::report;
use zonewatch::{
    FileSource, HttpSource, Settings, SimulatedSource, ZoneDirectory, ZoneRefresher, ZoneSource,
};
use zonewatch_adapters::http::HttpZoneClient;

#[derive(Parser, Debug)]
#[command(name = "zonewatch")]
#[command(about = "Live climate and alarm monitor for controller zones")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Monitoring server base URL, e.g. http://olympus.local:3000
    #[arg(long, conflicts_with_all = ["file", "simulate"])]
    endpoint: Option<String>,

    /// Read zones from a JSON file instead of the server
    #[arg(short, long, conflicts_with_all = ["simulate"])]
    file: Option<PathBuf>,

    /// Use simulated zones instead of the server
    #[arg(long)]
    simulate: bool,

    /// Zone to always refresh, as <host>/zone/<name> (repeatable)
    #[arg(short, long = "zone")]
    zones: Vec<String>,

    /// Only refresh zones given with --zone or in the settings file
    #[arg(long)]
    no_discover: bool,

    /// Seconds between zone list refreshes
    #[arg(long)]
    list_interval: Option<u64>,

    /// Seconds between zone detail refreshes
    #[arg(long)]
    zone_interval: Option<u64>,

    /// Refresh once, export the zones to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    apply_args(&mut settings, &args);
    settings.validate()?;

    let source = build_source(&args, &settings)?;
    let refresher = build_refresher(source, &settings)?;

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&refresher, &export_path).await;
    }

    run_watch(refresher).await
}

/// Command-line flags take precedence over settings.
fn apply_args(settings: &mut Settings, args: &Args) {
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(secs) = args.list_interval {
        settings.list_interval_secs = secs;
    }
    if let Some(secs) = args.zone_interval {
        settings.zone_interval_secs = secs;
    }
    if args.no_discover {
        settings.discover = false;
    }
    settings.zones.extend(args.zones.iter().cloned());
}

fn build_source(args: &Args, settings: &Settings) -> Result<Arc<dyn ZoneSource>> {
    if args.simulate {
        return Ok(Arc::new(SimulatedSource::new()));
    }
    if let Some(path) = &args.file {
        return Ok(Arc::new(FileSource::new(path)));
    }

    let client = HttpZoneClient::builder()
        .endpoint(settings.endpoint.clone())
        .timeout(settings.timeout())
        .build()
        .context("failed to build HTTP client")?;
    Ok(Arc::new(HttpSource::new(client)))
}

fn build_refresher(source: Arc<dyn ZoneSource>, settings: &Settings) -> Result<ZoneRefresher> {
    let mut builder = ZoneRefresher::builder(source)
        .zone_interval(settings.zone_interval())
        .track_all(settings.tracked_zones()?);

    builder = if settings.discover {
        builder.list_interval(settings.list_interval())
    } else {
        builder.without_discovery()
    };

    Ok(builder.build())
}

/// Run one refresh cycle and write the report
async fn export_to_file(refresher: &ZoneRefresher, export_path: &Path) -> Result<()> {
    let directory = refresher.refresh_once().await;
    report::write_export(&directory, export_path)
        .with_context(|| format!("failed to write {}", export_path.display()))?;

    println!(
        "Exported {} zones ({} unavailable) to {}",
        directory.len(),
        directory.unavailable_count(),
        export_path.display()
    );
    Ok(())
}

/// Print zone changes until interrupted
async fn run_watch(refresher: ZoneRefresher) -> Result<()> {
    let handle = refresher.start();
    let mut watch = handle.subscribe();
    let mut previous = ZoneDirectory::new();

    loop {
        tokio::select! {
            snapshot = watch.changed() => match snapshot {
                Some(directory) => {
                    print_changes(&previous, &directory);
                    previous = directory;
                }
                None => break,
            },
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                info!("Interrupted, stopping");
                break;
            }
        }
    }

    // Bounded wait for the refresh task to exit
    tokio::time::timeout(Duration::from_secs(2), handle.join())
        .await
        .ok();
    Ok(())
}

fn print_changes(previous: &ZoneDirectory, current: &ZoneDirectory) {
    for (key, entry) in current.iter() {
        if previous.entry(key) != Some(entry) {
            println!("{}", report::summary_line(key, entry));
        }
    }
    for key in previous.keys() {
        if current.entry(key).is_none() {
            println!("{}  removed", key);
        }
    }
}
