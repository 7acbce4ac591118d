use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use vitrina_cache::{
    CacheConfig, LoginThrottle, MemoryThrottleStore, RedisThrottleStore, ThrottleStore,
};
use vitrina_config::{
    CorsConfig, JwtConfig, RateLimitConfig, ServerConfig, StoreBackend, ThrottleBackend,
};
use vitrina_db::{MemoryStore, PgStore, Store, init_db_pool, run_migrations};

use crate::middleware::rate_limit::ApiRateLimiter;

const DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub login_throttle: Arc<LoginThrottle>,
    pub api_limiter: Arc<ApiRateLimiter>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .field("api_limiter", &self.api_limiter)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Assembles state around already-built backends.
    pub fn new(
        store: Arc<dyn Store>,
        throttle_store: Arc<dyn ThrottleStore>,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        let login_throttle = LoginThrottle::new(
            throttle_store,
            rate_limit_config.login_max_attempts,
            Duration::from_secs(rate_limit_config.login_window_secs),
        );
        let api_limiter = ApiRateLimiter::new(&rate_limit_config);

        Self {
            store,
            jwt_config,
            cors_config,
            rate_limit_config,
            login_throttle: Arc::new(login_throttle),
            api_limiter: Arc::new(api_limiter),
        }
    }
}

async fn init_store(backend: StoreBackend) -> anyhow::Result<Arc<dyn Store>> {
    match backend {
        StoreBackend::Postgres => {
            let database_url =
                std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
            let pool = init_db_pool(&database_url, DB_MAX_CONNECTIONS)
                .await
                .context("Failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn init_throttle_store(backend: ThrottleBackend) -> anyhow::Result<Arc<dyn ThrottleStore>> {
    match backend {
        ThrottleBackend::Memory => Ok(Arc::new(MemoryThrottleStore::new())),
        ThrottleBackend::Redis => {
            let cache_config = CacheConfig::from_env();
            let store = RedisThrottleStore::new(&cache_config.redis_url, cache_config.key_prefix)
                .await
                .context("Failed to connect to Redis")?;
            info!("Login throttle backed by Redis");
            Ok(Arc::new(store))
        }
    }
}

pub async fn init_app_state(server_config: &ServerConfig) -> anyhow::Result<AppState> {
    let store = init_store(server_config.store_backend).await?;
    let throttle_store = init_throttle_store(server_config.throttle_backend).await?;

    Ok(AppState::new(
        store,
        throttle_store,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        RateLimitConfig::from_env(),
    ))
}
