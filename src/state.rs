use anyhow::Result;
use std::sync::Arc;

use crate::auth::SharedSecretAuthenticator;
use crate::config::{Config, LogBackend, StoreConfig};
use crate::domain::prediction::PredictionCatalog;
use crate::service::HoroscopeService;
use crate::store::{CsvPredictionLog, MemoryPredictionLog, PredictionStore, SqlitePredictionLog};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<HoroscopeService>,
}

impl AppState {
    pub async fn from_config(conf: &Config) -> Result<Self> {
        let store = open_store(&conf.store).await?;

        let catalog = match &conf.catalog_path {
            Some(path) => {
                let catalog = PredictionCatalog::from_json_file(path)?;
                tracing::info!(path = %path, flavors = catalog.flavors.len(), "Loaded prediction catalog");
                catalog
            }
            None => PredictionCatalog::default(),
        };

        let service = HoroscopeService::new(
            store,
            catalog,
            Arc::new(SharedSecretAuthenticator::new(conf.admin_password.clone())),
            conf.recent_limit,
        );
        Ok(Self {
            service: Arc::new(service),
        })
    }
}

pub async fn open_store(conf: &StoreConfig) -> Result<Arc<dyn PredictionStore>> {
    let store: Arc<dyn PredictionStore> = match conf.backend {
        LogBackend::Csv => Arc::new(CsvPredictionLog::new(&conf.path)),
        LogBackend::Sqlite => Arc::new(SqlitePredictionLog::open(&conf.path).await?),
        LogBackend::Memory => Arc::new(MemoryPredictionLog::new()),
    };
    tracing::info!(backend = %conf.backend, path = %conf.path, "Prediction log ready");
    Ok(store)
}
