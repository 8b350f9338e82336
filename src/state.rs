use crate::auth::JwtKeys;
use crate::catalog::seed::seed_catalog;
use crate::config::{AppConfig, StoreKind};
use crate::store::{BookingStore, MemoryStore, PgStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtKeys>,
    pub store: Arc<dyn BookingStore>,
}

impl AppState {
    /// Connects the configured backend. Postgres migrations run here.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn BookingStore> = match config.store {
            StoreKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
                let pg = PgStore::connect(url).await?;
                pg.migrate().await?;
                tracing::info!("postgres store ready");
                Arc::new(pg)
            }
            StoreKind::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                let mem = MemoryStore::new();
                let seeded = seed_catalog(&mem).await?;
                tracing::info!(services = seeded, "in-memory catalog seeded");
                Arc::new(mem)
            }
        };
        Ok(Self::from_parts(Arc::new(config), store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn BookingStore>) -> Self {
        let jwt = Arc::new(JwtKeys::from(&config.jwt));
        Self { config, jwt, store }
    }

    /// State over an empty in-memory store with test JWT settings.
    pub fn fake() -> Self {
        Self::from_parts(
            Arc::new(AppConfig::for_tests()),
            Arc::new(MemoryStore::new()),
        )
    }
}
