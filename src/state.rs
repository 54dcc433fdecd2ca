use crate::config::Config;
use crate::store::Dialect;
use axum::extract::FromRef;
use sqlx::AnyPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: AnyPool,
    pub dialect: Dialect,
    pub config: Config,
}

impl FromRef<AppState> for AnyPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Dialect {
    fn from_ref(state: &AppState) -> Self {
        state.dialect
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
