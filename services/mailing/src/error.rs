use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Mailing service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum MailingServiceError {
    #[error("recipient not found")]
    RecipientNotFound,
    #[error("template not found")]
    TemplateNotFound,
    #[error("mailing not found")]
    MailingNotFound,
    #[error("recipient already exists")]
    RecipientAlreadyExists,
    #[error("invalid email")]
    InvalidEmail,
    #[error("window start is after window end")]
    InvalidWindow,
    #[error("subject is empty")]
    EmptySubject,
    #[error("invalid status")]
    InvalidStatus,
    #[error("invalid status transition")]
    InvalidStatusTransition,
    #[error("only created mailings can be edited")]
    MailingNotEditable,
    #[error("template is used by a launched mailing")]
    TemplateInUse,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MailingServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipientNotFound => "RECIPIENT_NOT_FOUND",
            Self::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            Self::MailingNotFound => "MAILING_NOT_FOUND",
            Self::RecipientAlreadyExists => "RECIPIENT_ALREADY_EXISTS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidWindow => "INVALID_WINDOW",
            Self::EmptySubject => "EMPTY_SUBJECT",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::MailingNotEditable => "MAILING_NOT_EDITABLE",
            Self::TemplateInUse => "TEMPLATE_IN_USE",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for MailingServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::RecipientNotFound | Self::TemplateNotFound | Self::MailingNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::RecipientAlreadyExists
            | Self::InvalidStatusTransition
            | Self::MailingNotEditable
            | Self::TemplateInUse => StatusCode::CONFLICT,
            Self::InvalidEmail | Self::InvalidWindow | Self::EmptySubject | Self::InvalidStatus => {
                StatusCode::BAD_REQUEST
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
