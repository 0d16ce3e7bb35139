use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courier_auth_types::identity::IdentityHeaders;
use courier_domain::mailing::{MailingStatus, Periodicity};

use crate::domain::types::{MailingJob, MailingJobDetail};
use crate::error::MailingServiceError;
use crate::handlers::actor;
use crate::state::AppState;
use crate::usecase::mailing::{
    CreateMailingInput, CreateMailingUseCase, DeleteMailingUseCase, GetMailingUseCase,
    ListMailingsUseCase, SetMailingActiveUseCase, UpdateMailingInput, UpdateMailingUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MailingResponse {
    pub id: Uuid,
    #[serde(serialize_with = "courier_core::serde::to_rfc3339_ms")]
    pub window_start: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "courier_core::serde::to_rfc3339_ms")]
    pub window_end: chrono::DateTime<chrono::Utc>,
    pub periodicity: Periodicity,
    pub status: MailingStatus,
    pub message_template_id: Uuid,
    pub owner_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_ids: Option<Vec<Uuid>>,
    #[serde(serialize_with = "courier_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "courier_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<MailingJob> for MailingResponse {
    fn from(job: MailingJob) -> Self {
        Self {
            id: job.id,
            window_start: job.window_start,
            window_end: job.window_end,
            periodicity: job.periodicity,
            status: job.status,
            message_template_id: job.message_template_id,
            owner_id: job.owner_id,
            recipient_ids: None,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

impl From<MailingJobDetail> for MailingResponse {
    fn from(detail: MailingJobDetail) -> Self {
        Self {
            recipient_ids: Some(detail.recipient_ids),
            ..MailingResponse::from(detail.job)
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct MailingListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub status: Option<String>,
}

// ── POST /mailings ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateMailingRequest {
    pub window_start: chrono::DateTime<chrono::Utc>,
    pub window_end: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub periodicity: Periodicity,
    pub message_template_id: Uuid,
    #[serde(default)]
    pub recipient_ids: Vec<Uuid>,
}

pub async fn create_mailing(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateMailingRequest>,
) -> Result<(StatusCode, Json<MailingResponse>), MailingServiceError> {
    let usecase = CreateMailingUseCase {
        mailings: state.mailing_repo(),
        templates: state.template_repo(),
        recipients: state.recipient_repo(),
    };
    let detail = usecase
        .execute(
            actor(&identity)?,
            CreateMailingInput {
                window_start: body.window_start,
                window_end: body.window_end,
                periodicity: body.periodicity,
                message_template_id: body.message_template_id,
                recipient_ids: body.recipient_ids,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

// ── PATCH /mailings/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMailingRequest {
    pub window_start: Option<chrono::DateTime<chrono::Utc>>,
    pub window_end: Option<chrono::DateTime<chrono::Utc>>,
    pub periodicity: Option<Periodicity>,
    pub message_template_id: Option<Uuid>,
    pub recipient_ids: Option<Vec<Uuid>>,
}

pub async fn update_mailing(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMailingRequest>,
) -> Result<Json<MailingResponse>, MailingServiceError> {
    let usecase = UpdateMailingUseCase {
        mailings: state.mailing_repo(),
        templates: state.template_repo(),
        recipients: state.recipient_repo(),
    };
    let detail = usecase
        .execute(
            actor(&identity)?,
            id,
            UpdateMailingInput {
                window_start: body.window_start,
                window_end: body.window_end,
                periodicity: body.periodicity,
                message_template_id: body.message_template_id,
                recipient_ids: body.recipient_ids,
            },
        )
        .await?;
    Ok(Json(detail.into()))
}

// ── GET /mailings ────────────────────────────────────────────────────────────

pub async fn get_mailings(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<MailingListQuery>,
) -> Result<Json<Vec<MailingResponse>>, MailingServiceError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<MailingStatus>)
        .transpose()
        .map_err(|_| MailingServiceError::InvalidStatus)?;
    let page = courier_domain::pagination::PageRequest::new(query.per_page, query.page);

    let usecase = ListMailingsUseCase {
        repo: state.mailing_repo(),
    };
    let jobs = usecase.execute(actor(&identity)?, status, page).await?;
    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}

// ── GET /mailings/{id} ───────────────────────────────────────────────────────

pub async fn get_mailing(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MailingResponse>, MailingServiceError> {
    let usecase = GetMailingUseCase {
        repo: state.mailing_repo(),
    };
    let detail = usecase.execute(actor(&identity)?, id).await?;
    Ok(Json(detail.into()))
}

// ── DELETE /mailings/{id} ────────────────────────────────────────────────────

pub async fn delete_mailing(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MailingServiceError> {
    let usecase = DeleteMailingUseCase {
        repo: state.mailing_repo(),
    };
    usecase.execute(actor(&identity)?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /mailings/{id}/deactivate, /activate ────────────────────────────────

pub async fn deactivate_mailing(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MailingResponse>, MailingServiceError> {
    set_active(identity, state, id, false).await
}

pub async fn activate_mailing(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MailingResponse>, MailingServiceError> {
    set_active(identity, state, id, true).await
}

async fn set_active(
    identity: IdentityHeaders,
    state: AppState,
    id: Uuid,
    active: bool,
) -> Result<Json<MailingResponse>, MailingServiceError> {
    let usecase = SetMailingActiveUseCase {
        repo: state.mailing_repo(),
    };
    let job = usecase.execute(actor(&identity)?, id, active).await?;
    Ok(Json(job.into()))
}
