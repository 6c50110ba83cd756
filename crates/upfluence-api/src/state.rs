use std::sync::Arc;

use anyhow::anyhow;
use tracing::error;

use upfluence_db::Database;

use crate::error::{ApiError, ApiResult};
use crate::session::SessionKeys;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionKeys,
    pub environment: String,
}

impl AppStateInner {
    pub fn new(db: Database, jwt_secret: &str, environment: impl Into<String>) -> AppState {
        Arc::new(Self {
            db,
            sessions: SessionKeys::new(jwt_secret),
            environment: environment.into(),
        })
    }
}

/// Run a database closure on the blocking pool.
pub(crate) async fn blocking_db<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    blocking(move || f(&state.db)).await
}

/// Run CPU-bound or blocking work (hashing, SQLite) off the async workers.
pub(crate) async fn blocking<F, T>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            Err(ApiError::Internal(anyhow!("blocking task failed")))
        }
    }
}
