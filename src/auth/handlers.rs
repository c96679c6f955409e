use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{
            AdminCreatedUser, AuthResponse, LoginRequest, MessageResponse, PublicUser,
            RegisterRequest, UpdatePasswordRequest, UpdateProfileRequest, UpdateRoleRequest,
        },
        extractors::Principal,
        jwt::JwtKeys,
        password,
        policy::{self, Role},
    },
    error::{ApiError, ApiResult},
    state::AppState,
    store::User,
};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Shared registration validation: normalized email, trimmed name,
/// parsed role (default `dev`).
fn validate_registration(payload: &RegisterRequest) -> ApiResult<(String, String, Role)> {
    let name = payload.name.trim().to_string();
    if name.chars().count() < 2 {
        return Err(ApiError::validation("Name must be at least 2 characters"));
    }
    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email"));
    }
    if payload.password.chars().count() < 6 {
        return Err(ApiError::validation("Password must be at least 6 characters"));
    }
    let role = match &payload.role {
        Some(value) => Role::parse(value)
            .ok_or_else(|| ApiError::validation("Role must be one of: owner, admin, analyst, dev"))?,
        None => Role::Dev,
    };
    Ok((name, email, role))
}

async fn create_user(
    state: &AppState,
    name: String,
    email: String,
    password: &str,
    role: Role,
) -> ApiResult<User> {
    let hash = password::hash_password(password)?;
    let user = User::new(name, email, hash, role);
    // The store decides uniqueness atomically; a pre-check here would
    // race with a concurrent registration for the same address.
    if !state.users.insert(user.clone()).await? {
        warn!(email = %user.email, "registration with taken email");
        return Err(ApiError::Conflict("Email already exists"));
    }
    info!(user_id = %user.id, role = %user.role, "user created");
    Ok(user)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (name, email, role) = validate_registration(&payload)?;
    let user = create_user(&state, name, email, &payload.password, role).await?;

    let token = JwtKeys::from_ref(&state).sign(user.id, user.role)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

/// Same validation as `register`, but gated to admins (owner bypass)
/// and no token is issued for the new account.
#[instrument(skip(state, payload))]
pub async fn register_admin(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AdminCreatedUser>)> {
    policy::require_role(&principal, &[Role::Admin])?;

    let (name, email, role) = validate_registration(&payload)?;
    let user = create_user(&state, name, email, &payload.password, role).await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminCreatedUser {
            id: user.id,
            email: user.email,
            role: user.role,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password are indistinguishable on purpose.
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(ApiError::Unauthenticated("Invalid credentials"))?;
    if !password::verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Unauthenticated("Invalid credentials"));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id, user.role)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<PublicUser>> {
    let user = state
        .users
        .find_by_id(principal.id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(PublicUser::from(&user)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<PublicUser>> {
    let name = payload.name.trim().to_string();
    if name.chars().count() < 2 {
        return Err(ApiError::validation("Name must be at least 2 characters"));
    }

    let mut user = state
        .users
        .find_by_id(principal.id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    user.name = name;
    user.updated_at = OffsetDateTime::now_utc();
    state.users.update(user.clone()).await?;

    Ok(Json(PublicUser::from(&user)))
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if payload.new_password.chars().count() < 6 {
        return Err(ApiError::validation(
            "New password must be at least 6 characters",
        ));
    }

    let mut user = state
        .users
        .find_by_id(principal.id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    if !password::verify_password(&payload.current_password, &user.password_hash)? {
        warn!(user_id = %user.id, "password change with wrong current password");
        return Err(ApiError::Unauthenticated("Current password is incorrect"));
    }

    user.password_hash = password::hash_password(&payload.new_password)?;
    user.updated_at = OffsetDateTime::now_utc();
    state.users.update(user).await?;

    info!(user_id = %principal.id, "password updated");
    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<User>>> {
    policy::require_role(&principal, &[Role::Admin, Role::Owner])?;
    let users = state.users.list().await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn update_role(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<User>> {
    policy::require_role(&principal, &[Role::Admin, Role::Owner])?;

    let requested = Role::parse(&payload.role)
        .ok_or_else(|| ApiError::validation("Role must be one of: owner, admin, analyst, dev"))?;

    let mut target = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    policy::can_mutate_role(&principal, target.id, target.role, requested)?;

    target.role = requested;
    target.updated_at = OffsetDateTime::now_utc();
    state.users.update(target.clone()).await?;

    info!(actor = %principal.id, target = %target.id, role = %requested, "role updated");
    Ok(Json(target))
}
