//! Router and shared application state.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use admet_core::PredictionService;

use crate::handlers;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

/// Build the service router.
pub fn router(service: PredictionService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };
    Router::new()
        .route("/health", get(handlers::health))
        .route("/properties", get(handlers::properties))
        .route("/smi", post(handlers::predict_smiles))
        .route("/upload_smi", post(handlers::upload_smiles))
        .with_state(state)
}
