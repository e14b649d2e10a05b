use crate::config::Config;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds configuration only; every request re-reads the record from disk.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: RecordStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = RecordStore::new(&config.primary_cv_path, &config.secondary_cv_path);
        Self { config, store }
    }
}
