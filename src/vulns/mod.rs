use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod model;
pub mod status;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/vulnerabilities",
            get(handlers::list_vulnerabilities).post(handlers::create_vulnerability),
        )
        .route(
            "/vulnerabilities/:id",
            get(handlers::get_vulnerability)
                .put(handlers::update_vulnerability)
                .delete(handlers::delete_vulnerability),
        )
}
