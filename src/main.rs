use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::fmt::format::FmtSpan;

use guardian_consensus::{
    GuardianApiState, GuardianConfig, MemoryStore, ModerationEngine, PostgresStore,
    SecurityMiddlewareConfig, SecurityState, StateStore, create_app,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first - bad values abort startup
    let config = GuardianConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {:#}", e);
        eprintln!("Please check the GUARDIAN_* environment variables.");
        e
    })?;

    init_logging(&config)?;

    info!("Starting Guardian moderation consensus server");
    config.log_summary();

    let store = open_store(&config).await?;
    let policy = config.to_policy();
    info!(
        verify_threshold = policy.verify_threshold,
        flag_threshold = policy.flag_threshold,
        senior_power = policy.senior_power,
        leaderboard_size = policy.leaderboard_size,
        "Moderation policy loaded"
    );
    let engine = Arc::new(ModerationEngine::new(store, policy));

    let security_state = SecurityState::new(SecurityMiddlewareConfig::from(&config));
    spawn_rate_limit_cleanup(security_state.clone());

    let app = create_app(GuardianApiState::new(engine), security_state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    info!("Guardian server listening on {}", bind_addr);
    info!(
        "Security middleware: Rate limit={}/min, Max body={}KB",
        config.security.rate_limit_per_minute,
        config.security.max_request_size / 1024
    );

    // Serve with connect info for client IP extraction
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Initialize logging at the configured level
fn init_logging(config: &GuardianConfig) -> Result<()> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(if config.logging.log_requests {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}

/// PostgreSQL when enabled, otherwise the in-memory store
async fn open_store(config: &GuardianConfig) -> Result<Arc<dyn StateStore>> {
    if !config.database.postgres_enabled {
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PostgresStore::connect(
        &config.database.postgres_url,
        config.database.postgres_max_connections,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to open state store at {}",
            config.display_postgres_url()
        )
    })?;
    store
        .init_schema()
        .await
        .context("Failed to initialize guardian schema")?;

    Ok(Arc::new(store))
}

/// Periodically forget clients whose rate-limit windows have expired
fn spawn_rate_limit_cleanup(security: SecurityState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            security.rate_limiter.cleanup();
        }
    });
}
