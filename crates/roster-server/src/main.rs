//! roster-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store and the listing cache, and serves the REST and GraphQL APIs. Built
//! with the `kafka` feature it also runs the enrichment pipeline against the
//! configured brokers.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roster_api::AppState;
use roster_cache::AnyCache;
use roster_core::{PeopleService, Validator};
use roster_ingest::{EnrichmentClient, RunStats};
use roster_server::Config;
use roster_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

type Service = PeopleService<SqliteStore, AnyCache>;

#[derive(Parser)]
#[command(author, version, about = "Roster people directory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let config = Config::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let level = config
    .log
    .level_filter()
    .with_context(|| format!("invalid log level {:?}", config.log.level))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy(),
    )
    .init();

  let store_path = config.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let cache = AnyCache::from_config(&config.cache)
    .await
    .context("failed to connect to listing cache")?;

  let validator = Arc::new(config.validator().context("invalid validation bounds")?);
  let bounds = validator.age_bounds();
  tracing::info!(min_age = bounds.min, max_age = bounds.max, "validator configured");
  let service = PeopleService::new(Arc::new(store), Arc::new(cache));
  let enricher =
    EnrichmentClient::new(config.enrichment.clone()).context("failed to build enrichment client")?;

  let shutdown = CancellationToken::new();
  tokio::spawn(cancel_on_signal(shutdown.clone()));

  let ingest = spawn_ingest(&config, enricher, Arc::clone(&validator), service.clone(), &shutdown)?;

  let app = roster_api::router(AppState::new(service, validator)).layer(TraceLayer::new_for_http());
  let address = config.http.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown.clone().cancelled_owned())
    .await
    .context("server error")?;

  // The server can also stop on its own; make sure the pipeline follows.
  shutdown.cancel();
  if let Some(handle) = ingest {
    let stats = handle.await.context("ingestion task panicked")?;
    tracing::info!(
      committed = stats.committed,
      dead_lettered = stats.dead_lettered,
      transport_errors = stats.transport_errors,
      "ingestion pipeline stopped"
    );
  }

  Ok(())
}

/// Cancel `token` on SIGINT or SIGTERM.
async fn cancel_on_signal(token: CancellationToken) {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
  tracing::info!("shutdown signal received");
  token.cancel();
}

#[cfg(feature = "kafka")]
fn spawn_ingest(
  config:    &Config,
  enricher:  EnrichmentClient,
  validator: Arc<Validator>,
  service:   Service,
  shutdown:  &CancellationToken,
) -> anyhow::Result<Option<JoinHandle<RunStats>>> {
  use roster_ingest::{
    Pipeline,
    queue::kafka::{KafkaSink, KafkaSource},
  };

  let source = KafkaSource::new(&config.queue).context("failed to create kafka consumer")?;
  let sink = KafkaSink::new(&config.queue).context("failed to create kafka producer")?;
  let pipeline = Pipeline::new(enricher, validator, service, sink);
  let shutdown = shutdown.clone();

  tracing::info!(brokers = ?config.queue.brokers, topic = %config.queue.fio_topic, "starting ingestion");
  Ok(Some(tokio::spawn(async move { pipeline.run(source, shutdown).await })))
}

#[cfg(not(feature = "kafka"))]
fn spawn_ingest(
  _config:    &Config,
  _enricher:  EnrichmentClient,
  _validator: Arc<Validator>,
  _service:   Service,
  _shutdown:  &CancellationToken,
) -> anyhow::Result<Option<JoinHandle<RunStats>>> {
  tracing::info!("built without the `kafka` feature; queue ingestion disabled");
  Ok(None)
}
