use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub bind_addr: SocketAddr,
    /// Guard the catalog routes with the bearer-token check.
    pub systems_require_auth: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "systems-portal".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "systems-portal-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let bind_addr: SocketAddr = format!(
            "{}:{}",
            std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            std::env::var("APP_PORT").unwrap_or_else(|_| "8000".into())
        )
        .parse()
        .context("APP_HOST/APP_PORT do not form a socket address")?;
        let systems_require_auth = std::env::var("SYSTEMS_REQUIRE_AUTH")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            max_connections,
            jwt,
            bind_addr,
            systems_require_auth,
        })
    }

    /// Configuration for tests and local runs without a database.
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            max_connections: 1,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            systems_require_auth: false,
        }
    }
}
