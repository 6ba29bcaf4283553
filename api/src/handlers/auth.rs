use axum::{extract::State, Json};
use common::errors::AuthError;
use serde::{Deserialize, Serialize};

use crate::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Login endpoint
///
/// Verifies the presented credentials against the stored hash and returns
/// a signed bearer token. Bad credentials map to a single generic 401;
/// anything unexpected maps to a generic 500 with detail kept server-side.
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ErrorResponse> {
    // Validate input before it reaches the verifier
    if req.email.is_empty() {
        return Err(ErrorResponse::bad_request("Email is required"));
    }
    if req.password.is_empty() {
        return Err(ErrorResponse::bad_request("Password is required"));
    }

    let token = state
        .auth_service
        .login(&req.email, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(email = %req.email, error = %e, "Login failed");
            match e {
                AuthError::InvalidCredentials => ErrorResponse::unauthorized(),
                _ => ErrorResponse::internal(),
            }
        })?;

    Ok(Json(LoginResponse { token }))
}
