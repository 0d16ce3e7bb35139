use axum::{Json, extract::State};

use courier_auth_types::identity::IdentityHeaders;

use crate::domain::types::MailingReport;
use crate::error::MailingServiceError;
use crate::handlers::actor;
use crate::state::AppState;
use crate::usecase::report::GetReportUseCase;

// ── GET /report ──────────────────────────────────────────────────────────────

pub async fn get_report(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<MailingReport>, MailingServiceError> {
    let usecase = GetReportUseCase {
        repo: state.report_repo(),
    };
    Ok(Json(usecase.execute(actor(&identity)?).await?))
}
