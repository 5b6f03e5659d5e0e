//! HTTP surface of the inventory: one endpoint, `/api/components`, answering
//! `action=list|options|get|add|update|delete` with a JSON envelope of
//! `{success, status_code, message, data}`.

mod api;
mod envelope;

use std::net::SocketAddr;

use axum::{routing::get, Router};
use records::InventoryManager;
use tower_http::trace::TraceLayer;

pub use api::{Action, ApiQuery};
pub use envelope::{ApiFailure, Envelope};

#[derive(Clone)]
pub struct AppState {
    pub manager: InventoryManager,
}

impl AppState {
    pub fn new(manager: InventoryManager) -> Self {
        Self { manager }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/components", get(api::dispatch).post(api::dispatch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(bind_addr: SocketAddr, state: AppState) -> Result<(), hyper::Error> {
    let app = router(state);

    tracing::info!("Binding to {}", bind_addr);
    axum::Server::bind(&bind_addr)
        .serve(app.into_make_service())
        .await?;
    tracing::info!("Exited axum bind");

    Ok(())
}
