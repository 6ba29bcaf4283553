use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    pub database: &'static str,
}

/// Health check endpoint
///
/// Issues a trivial query through the shared pool so the report reflects
/// actual database reachability, not just process liveness.
#[tracing::instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db_pool.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK",
                uptime: Some(state.uptime_seconds()),
                database: "connected",
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "ERROR",
                    uptime: None,
                    database: "disconnected",
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_response_serialization() {
        let response = HealthResponse {
            status: "OK",
            uptime: Some(12),
            database: "connected",
        };
        let json = serde_json::to_value(&response).expect("Failed to serialize");
        assert_eq!(
            json,
            serde_json::json!({ "status": "OK", "uptime": 12, "database": "connected" })
        );
    }

    #[test]
    fn test_unhealthy_response_omits_uptime() {
        let response = HealthResponse {
            status: "ERROR",
            uptime: None,
            database: "disconnected",
        };
        let json = serde_json::to_value(&response).expect("Failed to serialize");
        assert_eq!(
            json,
            serde_json::json!({ "status": "ERROR", "database": "disconnected" })
        );
    }
}
