use axum::extract::State;
use axum::http::StatusCode;

use courier_core::health::database_ready;

use crate::state::AppState;

/// `GET /readyz`: ready once the database answers. SMTP is not checked; a relay
/// outage shows up as failed attempts instead.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    database_ready(&state.db).await
}
