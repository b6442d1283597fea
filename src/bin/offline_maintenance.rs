use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use inventory_offline::{
    AppConfig, ConnectionPool, ConnectionStatus, HttpRemoteApi, LocalStore, MaintenanceReport,
    OfflineCacheService, OfflineStats, SqliteLocalStore,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
struct CliOptions {
    output: Option<PathBuf>,
    pretty: bool,
    stats_only: bool,
    database_url: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct MaintenanceJobReport {
    database_url: String,
    generated_at_ms: i64,
    stats_before: OfflineStats,
    maintenance: Option<MaintenanceReport>,
    stats_after: Option<OfflineStats>,
}

/// Maintenance never talks to the backend.
struct Offline;

#[async_trait]
impl ConnectionStatus for Offline {
    async fn is_connected(&self) -> bool {
        false
    }
}

fn usage() -> &'static str {
    "Usage: offline_maintenance [--database-url <url>] [--stats-only] [--pretty] [--output <path>]"
}

fn main() -> Result<()> {
    inventory_offline::init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(args)?;
    let database_url = resolve_database_url(&options);

    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = rt.block_on(async {
        run_job(&database_url, options.stats_only)
            .await
            .with_context(|| format!("Maintenance failed for {database_url}"))
    })?;

    let payload = to_json(&report, options.pretty)?;
    emit_payload(options.output.as_deref(), &payload)
}

async fn run_job(database_url: &str, stats_only: bool) -> Result<MaintenanceJobReport> {
    let config = AppConfig::from_env();
    let pool = ConnectionPool::new(
        database_url,
        Duration::from_secs(config.database.connection_timeout),
    )
    .await
    .with_context(|| format!("Failed to open database at {database_url}"))?;
    let store: Arc<dyn LocalStore> = Arc::new(
        SqliteLocalStore::open(pool)
            .await
            .context("Failed to initialize local store")?,
    );
    let remote = Arc::new(
        HttpRemoteApi::new(
            &config.remote.base_url,
            Duration::from_secs(config.remote.request_timeout_secs),
        )
        .context("Failed to build remote client")?,
    );
    let service = OfflineCacheService::new(Arc::clone(&store), remote, Arc::new(Offline))
        .with_action_retention_days(config.maintenance.action_retention_days);

    let stats_before = service.get_offline_stats().await;
    let (maintenance, stats_after) = if stats_only {
        (None, None)
    } else {
        let report = service.perform_maintenance().await;
        (Some(report), Some(service.get_offline_stats().await))
    };

    store.close().await.context("Failed to close local store")?;

    Ok(MaintenanceJobReport {
        database_url: database_url.to_string(),
        generated_at_ms: chrono::Utc::now().timestamp_millis(),
        stats_before,
        maintenance,
        stats_after,
    })
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn write_output(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

fn emit_payload(target: Option<&Path>, payload: &str) -> Result<()> {
    if let Some(path) = target {
        write_output(path, payload)?;
        println!("Report written to {}", path.display());
    } else {
        println!("{payload}");
    }
    Ok(())
}

fn parse_args<I>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = String>,
{
    let mut output: Option<PathBuf> = None;
    let mut pretty = false;
    let mut stats_only = false;
    let mut database_url: Option<String> = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--output requires a path\n{}", usage()))?;
                output = Some(PathBuf::from(path));
            }
            "--pretty" => {
                pretty = true;
            }
            "--stats-only" => {
                stats_only = true;
            }
            "--database-url" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--database-url requires a value\n{}", usage())
                })?;
                database_url = Some(value);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other => {
                bail!("Unknown argument: {other}\n{}", usage());
            }
        }
    }

    Ok(CliOptions {
        output,
        pretty,
        stats_only,
        database_url,
    })
}

fn resolve_database_url(options: &CliOptions) -> String {
    if let Some(url) = &options.database_url {
        return url.clone();
    }
    AppConfig::from_env().database.url
}
