use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use uuid::Uuid;

use courier_auth_types::identity::IdentityHeaders;
use courier_domain::mailing::AttemptOutcome;

use crate::domain::types::DeliveryAttempt;
use crate::error::MailingServiceError;
use crate::handlers::{PageQuery, actor};
use crate::state::AppState;
use crate::usecase::attempt::ListAttemptsUseCase;

#[derive(Serialize)]
pub struct AttemptResponse {
    pub id: Uuid,
    pub mailing_job_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub recipient_email: String,
    #[serde(serialize_with = "courier_core::serde::to_rfc3339_ms")]
    pub attempted_at: chrono::DateTime<chrono::Utc>,
    pub outcome: AttemptOutcome,
    pub response: Option<String>,
}

impl From<DeliveryAttempt> for AttemptResponse {
    fn from(a: DeliveryAttempt) -> Self {
        Self {
            id: a.id,
            mailing_job_id: a.mailing_job_id,
            recipient_id: a.recipient_id,
            recipient_email: a.recipient_email,
            attempted_at: a.attempted_at,
            outcome: a.outcome,
            response: a.response,
        }
    }
}

// ── GET /mailings/{id}/attempts ──────────────────────────────────────────────

pub async fn get_attempts(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<AttemptResponse>>, MailingServiceError> {
    let usecase = ListAttemptsUseCase {
        mailings: state.mailing_repo(),
        attempts: state.attempt_repo(),
    };
    let attempts = usecase
        .execute(actor(&identity)?, id, query.page_request())
        .await?;
    Ok(Json(attempts.into_iter().map(Into::into).collect()))
}
