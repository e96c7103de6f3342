use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        principal::AuthenticatedPrincipal,
    },
    error::DirectoryError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, DirectoryError> {
    let principal = state
        .directory
        .authenticate(&payload.email, &payload.password)
        .await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&principal).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        DirectoryError::Credential(e.to_string())
    })?;

    info!(email = %principal.username, role = %principal.authority, "employee logged in");
    Ok(Json(AuthResponse {
        access_token,
        principal,
    }))
}

/// Re-reads the principal so a deleted or re-roled employee is noticed.
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<AuthenticatedPrincipal>, DirectoryError> {
    let principal = state.directory.load_principal(&user.email).await?;
    Ok(Json(principal))
}
