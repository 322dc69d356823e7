use siteharvest::api::{build_app, AppState};
use siteharvest::config::cli::Command;
use siteharvest::config::Config;
use siteharvest::domain::SnapshotStore;
use siteharvest::error::{HarvestError, Result};
use siteharvest::infrastructure::FileSystemStore;
use siteharvest::scheduler;
use siteharvest::services::HarvestService;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::new()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.args.log_level))
        .map_err(|e| HarvestError::Other(e.to_string()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    config.ensure_directories()?;
    let store: Arc<dyn SnapshotStore> = Arc::new(FileSystemStore::with_limit(
        &config.args.data_dir,
        config.args.history_limit,
    ));
    let service = Arc::new(HarvestService::from_config(&config, Arc::clone(&store)));

    match config.args.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, service).await,
        Command::Run => {
            let snapshot = service.run().await?;
            info!(
                "Harvest completed: {} profiles, {} projects",
                snapshot.profile_count, snapshot.project_count
            );
            Ok(())
        }
        Command::Latest => {
            match store.read_latest() {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => info!("No snapshots stored yet"),
            }
            Ok(())
        }
    }
}

async fn serve(config: &Config, service: Arc<HarvestService>) -> Result<()> {
    let _scheduler = scheduler::build_scheduler(
        Arc::clone(&service),
        Duration::from_secs(config.args.interval_secs.max(1)),
    )
    .await?;

    if !config.args.no_initial_run {
        let service = Arc::clone(&service);
        tokio::spawn(async move { scheduler::run_and_log(&service).await });
    }

    let app = build_app(AppState { service });
    let listener = tokio::net::TcpListener::bind(config.args.bind).await?;
    info!("Read API listening on {}", config.args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal, starting graceful shutdown");
}
