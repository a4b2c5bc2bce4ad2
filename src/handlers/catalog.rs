use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::models::{Catalog, StorefrontItem};
use crate::state::AppState;

// GET /api/catalog
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.desk.manager().catalog().clone())
}

// GET /api/storefront
pub async fn get_storefront(State(state): State<Arc<AppState>>) -> Json<Vec<StorefrontItem>> {
    Json(state.desk.manager().catalog().storefront_items())
}
