use std::sync::Arc;

use shared::{get_db_connection, run_migrations, Config, DatabaseStorage, Storage};

use crate::services::{RandomSignalSource, RefreshScheduler, SignalSource};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub scheduler: Arc<RefreshScheduler>,
}

impl AppState {
    pub async fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let db = get_db_connection(&config.database_url).await?;
        tracing::info!("Connected to database successfully");
        if config.run_migrations {
            run_migrations(&db).await?;
        }

        let storage: Arc<dyn Storage> = Arc::new(DatabaseStorage::new(Arc::new(db)));
        Ok(Self::with_storage(storage, Arc::new(RandomSignalSource), config))
    }

    pub fn with_storage(
        storage: Arc<dyn Storage>,
        source: Arc<dyn SignalSource>,
        config: &Config,
    ) -> Self {
        let scheduler = Arc::new(RefreshScheduler::new(
            storage.clone(),
            source,
            config.watch_list.clone(),
            config.refresh_interval,
            config.warmup_delay,
        ));

        AppState { storage, scheduler }
    }
}
