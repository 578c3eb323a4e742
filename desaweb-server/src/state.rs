//! Application state shared across handlers

use sqlx::MySqlPool;
use std::sync::Arc;

use crate::assets::AssetStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: MySqlPool,
    assets: AssetStore,
}

impl AppState {
    pub fn new(pool: MySqlPool, assets: AssetStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pool, assets }),
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.inner.pool
    }

    pub fn assets(&self) -> &AssetStore {
        &self.inner.assets
    }
}
