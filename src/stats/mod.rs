use axum::{routing::get, Router};

use crate::state::AppState;

pub mod handlers;
pub mod summary;
pub mod trends;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::full))
        .route("/stats/public", get(handlers::public))
        .route("/stats/trends", get(handlers::trends))
}
