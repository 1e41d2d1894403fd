use crate::config::TrackerConfig;
use crate::models::StoreDocument;
use crate::storage::ActivityStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TrackerConfig>,
    pub store: ActivityStore,
    pub data: Arc<Mutex<StoreDocument>>,
}

impl AppState {
    pub fn new(config: TrackerConfig, store: ActivityStore, data: StoreDocument) -> Self {
        Self {
            config: Arc::new(config),
            store,
            data: Arc::new(Mutex::new(data)),
        }
    }
}
