use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courier_auth_types::identity::IdentityHeaders;

use crate::domain::types::MessageTemplate;
use crate::error::MailingServiceError;
use crate::handlers::{PageQuery, actor};
use crate::state::AppState;
use crate::usecase::template::{
    CreateTemplateInput, CreateTemplateUseCase, GetTemplateUseCase, ListTemplatesUseCase,
    UpdateTemplateInput, UpdateTemplateUseCase,
};

#[derive(Serialize)]
pub struct TemplateResponse {
    pub id: Uuid,
    pub subject: String,
    pub body: String,
    pub owner_id: Option<Uuid>,
    #[serde(serialize_with = "courier_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<MessageTemplate> for TemplateResponse {
    fn from(t: MessageTemplate) -> Self {
        Self {
            id: t.id,
            subject: t.subject,
            body: t.body,
            owner_id: t.owner_id,
            created_at: t.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateTemplateRequest {
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

// ── POST /templates ──────────────────────────────────────────────────────────

pub async fn create_template(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateResponse>), MailingServiceError> {
    let usecase = CreateTemplateUseCase {
        repo: state.template_repo(),
    };
    let template = usecase
        .execute(
            actor(&identity)?,
            CreateTemplateInput {
                subject: body.subject,
                body: body.body,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(template.into())))
}

// ── GET /templates ───────────────────────────────────────────────────────────

pub async fn get_templates(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<TemplateResponse>>, MailingServiceError> {
    let usecase = ListTemplatesUseCase {
        repo: state.template_repo(),
    };
    let templates = usecase
        .execute(actor(&identity)?, query.page_request())
        .await?;
    Ok(Json(templates.into_iter().map(Into::into).collect()))
}

// ── GET /templates/{id} ──────────────────────────────────────────────────────

pub async fn get_template(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateResponse>, MailingServiceError> {
    let usecase = GetTemplateUseCase {
        repo: state.template_repo(),
    };
    let template = usecase.execute(actor(&identity)?, id).await?;
    Ok(Json(template.into()))
}

// ── PATCH /templates/{id} ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateTemplateRequest {
    pub subject: Option<String>,
    pub body: Option<String>,
}

pub async fn update_template(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateResponse>, MailingServiceError> {
    let usecase = UpdateTemplateUseCase {
        repo: state.template_repo(),
    };
    let template = usecase
        .execute(
            actor(&identity)?,
            id,
            UpdateTemplateInput {
                subject: body.subject,
                body: body.body,
            },
        )
        .await?;
    Ok(Json(template.into()))
}
