use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::database::Store;
use crate::routes::{climate, index};

// Anything that goes in here must be a handle or pointer that can be cloned.
// The underlying state itself should be shared.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::get_index))
        .nest("/api/v1.0", climate::routes(state))
        .layer(TraceLayer::new_for_http())
}
