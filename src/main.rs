use anyhow::Result;
use pastry_market::application::{
    ports::{
        geolocation::GeolocationProvider,
        media_storage::MediaStorage,
        security::{PasswordHasher, TokenManager},
        time::Clock,
    },
    services::{ApplicationServices, Ports, Repositories},
};
use pastry_market::config::AppConfig;
use pastry_market::infrastructure::{
    database,
    geolocation::HttpGeolocationProvider,
    repositories::{
        PostgresFollowRepository, PostgresLikeRepository, PostgresPastryRepository,
        PostgresRefreshTokenRepository, PostgresUserRepository,
    },
    security::{password::Argon2PasswordHasher, token::BiscuitTokenManager},
    storage::LocalMediaStorage,
    sweeper::spawn_refresh_token_sweeper,
    time::SystemClock,
};
use pastry_market::presentation::http::{routes::build_router, state::HttpState};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url(), config.db_max_connections()).await?;
    database::run_migrations(&pool).await?;

    let pastries = Arc::new(PostgresPastryRepository::new(pool.clone()));
    let repos = Repositories {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        refresh_tokens: Arc::new(PostgresRefreshTokenRepository::new(pool.clone())),
        pastry_write: pastries.clone(),
        pastry_read: pastries,
        likes: Arc::new(PostgresLikeRepository::new(pool.clone())),
        follows: Arc::new(PostgresFollowRepository::new(pool)),
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let token_manager: Arc<dyn TokenManager> = Arc::new(BiscuitTokenManager::new(
        config.biscuit_private_key(),
        config.access_token_ttl(),
        config.refresh_token_ttl(),
        Arc::clone(&clock),
    )?);

    let http_client = reqwest::Client::builder()
        .timeout(GEOLOCATION_TIMEOUT)
        .build()?;
    let geolocation: Arc<dyn GeolocationProvider> = Arc::new(HttpGeolocationProvider::new(
        http_client,
        config.geolocation_api_url(),
        config.geolocation_api_key(),
        config.geolocation_cache_ttl(),
    ));
    let media_storage: Arc<dyn MediaStorage> = Arc::new(
        LocalMediaStorage::new(config.media_root(), config.media_base_url()).await?,
    );

    let services = Arc::new(ApplicationServices::new(
        repos,
        Ports {
            password_hasher,
            token_manager,
            clock,
            geolocation,
            media_storage,
        },
    ));

    let sweeper = spawn_refresh_token_sweeper(
        Arc::clone(&services.user_commands),
        config.refresh_sweep_interval(),
    );

    let state = HttpState::new(Arc::clone(&services));
    let mut app = build_router(state, config.allowed_origins());
    if config.media_base_url().starts_with('/') {
        app = app.nest_service(config.media_base_url(), ServeDir::new(config.media_root()));
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    sweeper.abort();
    served?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
