use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courier_auth_types::identity::IdentityHeaders;

use crate::domain::types::Recipient;
use crate::error::MailingServiceError;
use crate::handlers::{PageQuery, actor};
use crate::state::AppState;
use crate::usecase::recipient::{
    CreateRecipientInput, CreateRecipientUseCase, GetRecipientUseCase, ListRecipientsUseCase,
    SetRecipientActiveUseCase, UpdateRecipientInput, UpdateRecipientUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecipientResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub note: Option<String>,
    pub is_active: bool,
    pub owner_id: Option<Uuid>,
    #[serde(serialize_with = "courier_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "courier_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Recipient> for RecipientResponse {
    fn from(r: Recipient) -> Self {
        Self {
            id: r.id,
            email: r.email,
            name: r.name,
            note: r.note,
            is_active: r.is_active,
            owner_id: r.owner_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ── POST /recipients ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRecipientRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub note: Option<String>,
}

pub async fn create_recipient(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateRecipientRequest>,
) -> Result<(StatusCode, Json<RecipientResponse>), MailingServiceError> {
    let usecase = CreateRecipientUseCase {
        repo: state.recipient_repo(),
    };
    let recipient = usecase
        .execute(
            actor(&identity)?,
            CreateRecipientInput {
                email: body.email,
                name: body.name,
                note: body.note,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(recipient.into())))
}

// ── GET /recipients ──────────────────────────────────────────────────────────

pub async fn get_recipients(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<RecipientResponse>>, MailingServiceError> {
    let usecase = ListRecipientsUseCase {
        repo: state.recipient_repo(),
    };
    let recipients = usecase
        .execute(actor(&identity)?, query.page_request())
        .await?;
    Ok(Json(recipients.into_iter().map(Into::into).collect()))
}

// ── GET /recipients/{id} ─────────────────────────────────────────────────────

pub async fn get_recipient(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipientResponse>, MailingServiceError> {
    let usecase = GetRecipientUseCase {
        repo: state.recipient_repo(),
    };
    let recipient = usecase.execute(actor(&identity)?, id).await?;
    Ok(Json(recipient.into()))
}

// ── PATCH /recipients/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRecipientRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub note: Option<String>,
}

pub async fn update_recipient(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRecipientRequest>,
) -> Result<Json<RecipientResponse>, MailingServiceError> {
    let usecase = UpdateRecipientUseCase {
        repo: state.recipient_repo(),
    };
    let recipient = usecase
        .execute(
            actor(&identity)?,
            id,
            UpdateRecipientInput {
                email: body.email,
                name: body.name,
                note: body.note,
            },
        )
        .await?;
    Ok(Json(recipient.into()))
}

// ── POST /recipients/{id}/block, /unblock ────────────────────────────────────

pub async fn block_recipient(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipientResponse>, MailingServiceError> {
    set_active(identity, state, id, false).await
}

pub async fn unblock_recipient(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipientResponse>, MailingServiceError> {
    set_active(identity, state, id, true).await
}

async fn set_active(
    identity: IdentityHeaders,
    state: AppState,
    id: Uuid,
    is_active: bool,
) -> Result<Json<RecipientResponse>, MailingServiceError> {
    let usecase = SetRecipientActiveUseCase {
        repo: state.recipient_repo(),
    };
    let recipient = usecase.execute(actor(&identity)?, id, is_active).await?;
    Ok(Json(recipient.into()))
}
