use std::sync::Arc;

use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;
use trackbridge::Bridge;

use crate::gateway;

pub const WS_ROUTE: &str = "/api/v1.1/ws/connect";

#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<Bridge>,
    /// Cancelled on server shutdown; open sessions close when it fires.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(bridge: Bridge, shutdown: CancellationToken) -> Self {
        Self {
            bridge: Arc::new(bridge),
            shutdown,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(WS_ROUTE, get(gateway::ws_connect))
        .with_state(state)
}
