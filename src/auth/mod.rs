use axum::{
    routing::{get, post, put},
    Router,
};
use tracing::{info, warn};

use crate::{config::AdminSeed, state::AppState, store::User};

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod policy;

/// Creates the bootstrap admin account if its email is still free.
/// Returns whether a new account was created.
pub async fn seed_admin(state: &AppState, seed: &AdminSeed) -> anyhow::Result<bool> {
    let email = seed.email.trim().to_lowercase();
    let hash = password::hash_password(&seed.password)?;
    let admin = User::new(seed.name.clone(), email, hash, policy::Role::Admin);

    if !state.users.insert(admin.clone()).await? {
        warn!(email = %admin.email, "admin user already exists, skipping seed");
        return Ok(false);
    }
    info!(user_id = %admin.id, email = %admin.email, "admin user seeded");
    Ok(true)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/register/admin", post(handlers::register_admin))
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::me))
        .route("/auth/profile", put(handlers::update_profile))
        .route("/auth/password", put(handlers::update_password))
        .route("/auth/users", get(handlers::list_users))
        .route("/auth/users/:id/role", put(handlers::update_role))
}
