use axum::response::IntoResponse;

/// Index/landing handler
#[tracing::instrument]
pub async fn index() -> impl IntoResponse {
    "Hello from server"
}
