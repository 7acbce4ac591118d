//! HTTP server and backend selection settings.

use crate::env;

/// Where users and products are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Where login throttle windows are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleBackend {
    Memory,
    Redis,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub throttle_backend: ThrottleBackend,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            store_backend: StoreBackend::Postgres,
            throttle_backend: ThrottleBackend::Memory,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let store_backend = match env::string("STORE_BACKEND", "postgres")
            .to_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            _ => StoreBackend::Postgres,
        };
        let throttle_backend = match env::string("THROTTLE_BACKEND", "memory")
            .to_lowercase()
            .as_str()
        {
            "redis" => ThrottleBackend::Redis,
            _ => ThrottleBackend::Memory,
        };

        Self {
            host: env::string("HOST", &defaults.host),
            port: env::parsed("PORT", defaults.port),
            store_backend,
            throttle_backend,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self {
            allowed_origins: env::list(
                "ALLOWED_ORIGINS",
                "http://localhost:3000,http://localhost:5173",
            ),
        }
    }
}
