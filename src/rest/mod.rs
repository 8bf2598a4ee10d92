use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};

use crate::{indicator::IndicatorSource, storage::Storage};

mod error;
mod handlers;
pub mod models;

use handlers::{
    delete_collection, get_collection, get_country_entry, get_ranked_entries, health,
    import_collection, list_collections, not_found,
};

#[derive(Clone)]
pub struct AppState<S: Storage> {
    pub storage: S,
    pub source: Arc<dyn IndicatorSource>,
    pub started_at: std::time::SystemTime,
}

impl<S: Storage> AppState<S> {
    pub fn new(storage: S, source: Arc<dyn IndicatorSource>) -> Self {
        Self {
            storage,
            source,
            started_at: std::time::SystemTime::now(),
        }
    }
}

pub fn router<S: Storage + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route(
            "/collections",
            get(list_collections::<S>).post(import_collection::<S>),
        )
        .route(
            "/collections/:id",
            get(get_collection::<S>).delete(delete_collection::<S>),
        )
        .route("/collections/:id/:year", get(get_ranked_entries::<S>))
        .route(
            "/collections/:id/:year/:country",
            get(get_country_entry::<S>),
        )
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: Storage + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    state: AppState<S>,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 REST listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
