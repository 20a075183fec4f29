//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, background task spawning, and the Axum
//! server lifecycle including graceful shutdown.

use crate::config::Config;
use crate::domain::availability::{AvailabilityMonitor, HttpProber};
use crate::domain::click_queue::ClickQueue;
use crate::domain::click_worker::ClickWorkerPool;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::persistence::{PgClickRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Opens the PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if no connection can be established within
/// `DB_CONNECT_TIMEOUT`.
pub async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    info!("Connected to database");
    Ok(pool)
}

/// Applies pending schema migrations from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to apply database migrations")?;

    info!("Database migrations applied");
    Ok(())
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Click queue and worker pool
/// - Availability monitor
/// - Axum HTTP server
///
/// On Ctrl+C or SIGTERM the server stops accepting connections, the monitor
/// is cancelled and the click workers drain the queue for up to
/// `SHUTDOWN_GRACE_SECS`.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The probe HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect(&config).await?;
    run_migrations(&pool).await?;

    let listener = bind(&config.listen_addr).await?;

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let click_repository: Arc<dyn ClickRepository> =
        Arc::new(PgClickRepository::new(pool.clone()));

    let prober = HttpProber::new(config.monitor_probe_timeout())
        .context("Failed to build HTTP client for availability probes")?;
    let monitor = AvailabilityMonitor::new(
        link_repository.clone(),
        Arc::new(prober),
        config.monitor_interval(),
        config.monitor_probe_concurrency,
    );

    let (click_queue, click_receiver) = ClickQueue::new(config.click_queue_capacity);
    let workers = ClickWorkerPool::start(
        click_receiver,
        click_repository.clone(),
        config.click_workers,
    );
    let background = BackgroundTasks::spawn(monitor, workers);

    let state = AppState::new(
        link_repository,
        click_repository,
        click_queue,
        config.base_url.clone(),
    );

    let app = app_router(state);

    let served = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error");

    match &served {
        Ok(()) => info!("HTTP server stopped, shutting down background tasks"),
        Err(e) => error!(error = %e, "HTTP server failed, shutting down background tasks"),
    }

    if !background.shutdown(config.shutdown_grace()).await {
        warn!("Some buffered clicks may not have been persisted");
    }

    pool.close().await;
    info!("Shutdown complete");

    served
}

/// Binds the HTTP listener on `listen_addr`.
async fn bind(listen_addr: &str) -> Result<tokio::net::TcpListener> {
    let addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{listen_addr}'"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on http://{addr}");
    Ok(listener)
}

/// The availability monitor and click workers running next to the server.
struct BackgroundTasks {
    monitor_shutdown: CancellationToken,
    monitor_task: JoinHandle<()>,
    workers: ClickWorkerPool,
}

impl BackgroundTasks {
    fn spawn(monitor: AvailabilityMonitor, workers: ClickWorkerPool) -> Self {
        let monitor_shutdown = CancellationToken::new();
        let monitor_task = tokio::spawn({
            let shutdown = monitor_shutdown.clone();
            async move { monitor.run(shutdown).await }
        });

        Self {
            monitor_shutdown,
            monitor_task,
            workers,
        }
    }

    /// Stops the monitor, then drains the click queue for up to `grace`.
    ///
    /// Returns `false` if the workers did not finish in time.
    async fn shutdown(self, grace: Duration) -> bool {
        self.monitor_shutdown.cancel();
        if let Err(e) = self.monitor_task.await {
            error!(error = %e, "Availability monitor terminated abnormally");
        }

        self.workers.shutdown(grace).await
    }
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
