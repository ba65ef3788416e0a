use crate::config::AppConfig;
use crate::db;
use crate::store::{postgres::PgStore, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connect and migrate; any failure here should abort startup.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        let store = Arc::new(PgStore::new(pool)) as Arc<dyn Store>;
        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<dyn Store>, secret: Option<&str>) -> Self {
        use crate::config::JwtConfig;

        let config = Arc::new(AppConfig {
            database_url: "postgres://postgres@localhost:5432/api".into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: secret.map(str::to_string),
                leeway_secs: 0,
            },
        });
        Self::from_parts(store, config)
    }
}
