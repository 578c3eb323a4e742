//! Static serving of uploaded images
//!
//! `GET /uploads/<class>/<filename>` returns the raw file, 404 if absent.

use axum::Router;
use tower_http::services::ServeDir;

use crate::assets::{AssetClass, AssetStore};

/// One `ServeDir` per asset class
pub fn router<S>(assets: &AssetStore) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    AssetClass::ALL
        .into_iter()
        .fold(Router::new(), |router, class| {
            router.nest_service(class.url_prefix(), ServeDir::new(assets.class_dir(class)))
        })
}
