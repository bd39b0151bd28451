mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StoreBackend};
use crate::core::database;
use crate::core::router::{build_router, AppServices};
use crate::features::auth::repositories::{
    InMemoryUserRepository, PgUserRepository, UserRepository,
};
use crate::features::auth::{JwtService, PasswordHasher};
use crate::features::reports::repositories::{
    InMemoryReportRepository, PgReportRepository, ReportRepository,
};
use crate::modules::storage::PhotoStorage;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Select the store backing users and reports
    let (users, reports): (Arc<dyn UserRepository>, Arc<dyn ReportRepository>) =
        match (config.store.backend, &config.database) {
            (StoreBackend::Postgres, Some(db_config)) => {
                let pool = database::create_pool(db_config).await?;
                tracing::info!("Database connection pool created");

                tracing::info!("Running database migrations...");
                database::run_migrations(&pool)
                    .await
                    .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
                tracing::info!("Database migrations completed successfully");

                (
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgReportRepository::new(pool)),
                )
            }
            (StoreBackend::Postgres, None) => {
                anyhow::bail!("Postgres store selected but no database configuration loaded")
            }
            (StoreBackend::Memory, _) => {
                tracing::warn!("Using in-memory store: data is lost on restart");
                (
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryReportRepository::new()),
                )
            }
        };

    // Initialize photo storage
    let storage = Arc::new(PhotoStorage::new(config.upload.dir.clone()));
    storage
        .ensure_dir()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare photo storage: {}", e))?;

    // Initialize auth and report services
    let jwt = Arc::new(JwtService::from_config(&config.auth));
    let services = AppServices::new(
        users,
        reports,
        jwt,
        PasswordHasher::new(config.auth.password_hash_iterations),
        storage,
        config.upload.max_photo_size,
    );
    tracing::info!("Services initialized");

    // Seed the first admin account
    if let Some((email, password)) = config.auth.admin_seed() {
        services
            .auth
            .ensure_admin(email, password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed admin account: {}", e))?;
    }

    let app = build_router(&services, &config.app, &config.upload, &config.swagger);

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
