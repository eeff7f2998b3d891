use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::{
        jwt::{JwtKeys, TokenService},
        password::{Argon2Hasher, PasswordHasher},
        services::AuthService,
    },
    config::AppConfig,
    db,
    systems::{
        repo::{MemorySystemRepo, PgSystemRepo, SystemRepo},
        services::SystemCatalog,
    },
    users::{
        repo::{MemoryUserRepo, PgUserRepo, UserRepo},
        services::UserDirectory,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<dyn TokenService>,
    pub users: UserDirectory,
    pub auth: AuthService,
    pub systems: SystemCatalog,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let hasher = Arc::new(Argon2Hasher::default()) as Arc<dyn PasswordHasher>;

        let Some(database_url) = config.database_url.clone() else {
            warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
            return Ok(Self::in_memory(config, hasher));
        };

        let pool = db::connect(&database_url, config.max_connections).await?;
        info!("connected to database");
        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(pool.clone())),
            Arc::new(PgSystemRepo::new(pool)),
            hasher,
        ))
    }

    pub fn in_memory(config: AppConfig, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self::from_parts(
            config,
            Arc::new(MemoryUserRepo::new()),
            Arc::new(MemorySystemRepo::new()),
            hasher,
        )
    }

    pub fn from_parts(
        config: AppConfig,
        user_repo: Arc<dyn UserRepo>,
        system_repo: Arc<dyn SystemRepo>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let tokens = Arc::new(JwtKeys::from(&config.jwt)) as Arc<dyn TokenService>;
        let users = UserDirectory::new(user_repo, hasher);
        let auth = AuthService::new(users.clone(), tokens.clone());
        let systems = SystemCatalog::new(system_repo);
        Self {
            config: Arc::new(config),
            tokens,
            users,
            auth,
            systems,
        }
    }
}
