use axum::{Json, extract::State};

use courier_auth_types::identity::IdentityHeaders;
use courier_domain::account::Action;

use crate::domain::types::SweepReport;
use crate::error::MailingServiceError;
use crate::handlers::actor;
use crate::state::AppState;
use crate::usecase::sweep::Sweeper;

// ── POST /sweeps ─────────────────────────────────────────────────────────────

/// Run one sweep pass now. Safe to call while the scheduler is running.
pub async fn run_sweep(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<SweepReport>, MailingServiceError> {
    let actor = actor(&identity)?;
    if !actor.can(Action::RunSweep) {
        return Err(MailingServiceError::Forbidden);
    }
    tracing::info!(actor = %actor.account_id, "manual sweep requested");
    let report = state.sweeper().sweep().await?;
    Ok(Json(report))
}
