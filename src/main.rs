use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ottsub_api::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, PgStore},
    routes::{create_router, AppState},
    services::{
        auth::JwtVerifier,
        movies::{
            gemini::GeminiProviderLookup, omdb::OmdbMovieSearch, MovieSearcher, ProviderLookup,
        },
        notifier::HttpMailNotifier,
        sweep::{ReminderSchedule, ReminderSweep},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ottsub_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));
    store.migrate().await?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let providers: Option<Arc<dyn ProviderLookup>> = match config.gemini_api_key.clone() {
        Some(key) if !key.is_empty() => Some(Arc::new(GeminiProviderLookup::new(
            cache.clone(),
            key,
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        ))),
        _ => {
            tracing::warn!("GEMINI_API_KEY not set, movie results will carry no providers");
            None
        }
    };

    let movies: Option<Arc<dyn MovieSearcher>> = match config.omdb_api_key.clone() {
        Some(key) if !key.is_empty() => Some(Arc::new(OmdbMovieSearch::new(
            cache.clone(),
            key,
            config.omdb_api_url.clone(),
            providers,
        ))),
        _ => {
            tracing::warn!("OMDB_API_KEY not set, movie search is disabled");
            None
        }
    };

    let schedule = ReminderSchedule::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Invalid reminder schedule: {}", e))?;

    let sweep_handle = match config.mail_credentials() {
        Some(_) if schedule.target_days.is_empty() => {
            tracing::warn!("EXPIRY_REMINDER_DAYS has no positive values, reminder emails are off");
            None
        }
        Some((api_url, api_key)) => {
            let notifier = Arc::new(HttpMailNotifier::new(
                api_url.to_string(),
                api_key.to_string(),
                config.mail_from.clone(),
            ));
            let sweep = Arc::new(ReminderSweep::new(store.clone(), notifier, schedule.clone()));
            Some(sweep.spawn())
        }
        None => {
            tracing::warn!("Mail API not configured, reminder emails are off");
            None
        }
    };

    let state = Arc::new(AppState {
        subscriptions: store.clone(),
        users: store,
        verifier: Arc::new(JwtVerifier::new(&config.jwt_secret)),
        movies,
        timezone: schedule.timezone,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = sweep_handle {
        handle.abort();
    }
    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
