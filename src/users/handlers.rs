use axum::{
    extract::State,
    routing::{post, put},
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::password,
    error::{message, ApiError, AppJson, AppPath},
    state::AppState,
    store::{NewUser, UserChanges},
};

use super::dto::{normalize_email, LoginRequest, RegisterRequest, UpdateUserRequest};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/:userId", put(update_user).delete(delete_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    payload.email = normalize_email(&payload.email);

    if let Err(reason) = payload.validate() {
        warn!(email = %payload.email, reason, "registration rejected");
        return Err(ApiError::BadRequest(reason.into()));
    }

    let password_hash = password::hash(payload.password)
        .await
        .map_err(|e| ApiError::internal("Failed to set password", e))?;

    let user = state
        .store
        .create_user(NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
        })
        .await
        .map_err(|e| ApiError::internal("Failed to register user", format!("{e:#}")))?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(message("User registered successfully"))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<AppJson<LoginRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let AppJson(payload) = payload.map_err(|e| {
        warn!(error = %e, "login body rejected");
        ApiError::BadRequest("Invalid request data".into())
    })?;
    let email = normalize_email(&payload.email);

    // Lookup failures of any kind read as "no such user" to the caller.
    let user = match state.store.find_user_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(%email, "login unknown email");
            return Err(ApiError::Unauthorized("User not found".into()));
        }
        Err(e) => {
            let cause = format!("{e:#}");
            tracing::error!(error = %cause, "find_user_by_email failed");
            return Err(ApiError::Unauthorized("User not found".into()));
        }
    };

    if let Err(e) = password::verify(payload.password, user.password_hash).await {
        warn!(user_id = user.id, error = %e, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid password".into()));
    }

    info!(user_id = user.id, "user logged in");
    Ok(message("Login successful"))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let password_hash = match payload.password {
        Some(plain) => Some(
            password::hash(plain)
                .await
                .map_err(|e| ApiError::internal("Failed to update user", e))?,
        ),
        None => None,
    };

    let changes = UserChanges {
        username: payload.username,
        email: payload.email.as_deref().map(normalize_email),
        password_hash,
    };

    let rows = state
        .store
        .update_user(user_id, changes)
        .await
        .map_err(|e| ApiError::internal("Failed to update user", format!("{e:#}")))?;

    debug!(user_id, rows, "user update applied");
    Ok(message("User updated successfully"))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<Value>, ApiError> {
    let rows = state
        .store
        .delete_user(user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete user", format!("{e:#}")))?;

    debug!(user_id, rows, "user soft-deleted");
    Ok(message("User deleted successfully"))
}
