use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

/// `GET /healthz`. The process is up; dependencies are not consulted.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness status for a service backed by `db`: 503 until a ping succeeds.
pub async fn database_ready(db: &DatabaseConnection) -> StatusCode {
    match db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            ::tracing::warn!(error = %e, "database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
