use chrono::Utc;
use uuid::Uuid;

use courier_domain::account::{Action, Actor};
use courier_domain::pagination::PageRequest;

use crate::domain::repository::TemplateRepository;
use crate::domain::types::MessageTemplate;
use crate::error::MailingServiceError;

// ── CreateTemplate ───────────────────────────────────────────────────────────

pub struct CreateTemplateInput {
    pub subject: String,
    pub body: String,
}

pub struct CreateTemplateUseCase<R: TemplateRepository> {
    pub repo: R,
}

impl<R: TemplateRepository> CreateTemplateUseCase<R> {
    pub async fn execute(
        &self,
        actor: Actor,
        input: CreateTemplateInput,
    ) -> Result<MessageTemplate, MailingServiceError> {
        if !actor.can(Action::ManageOwn) {
            return Err(MailingServiceError::Forbidden);
        }
        let subject = input.subject.trim();
        if subject.is_empty() {
            return Err(MailingServiceError::EmptySubject);
        }
        let template = MessageTemplate {
            id: Uuid::now_v7(),
            subject: subject.to_owned(),
            body: input.body,
            owner_id: Some(actor.account_id),
            created_at: Utc::now(),
        };
        self.repo.create(&template).await?;
        Ok(template)
    }
}

// ── UpdateTemplate ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateTemplateInput {
    pub subject: Option<String>,
    pub body: Option<String>,
}

pub struct UpdateTemplateUseCase<R: TemplateRepository> {
    pub repo: R,
}

impl<R: TemplateRepository> UpdateTemplateUseCase<R> {
    /// A template is frozen once any mailing using it has launched.
    pub async fn execute(
        &self,
        actor: Actor,
        id: Uuid,
        input: UpdateTemplateInput,
    ) -> Result<MessageTemplate, MailingServiceError> {
        let mut template = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(MailingServiceError::TemplateNotFound)?;
        if !actor.can_act_on(template.owner_id, Action::EditAny) {
            return Err(MailingServiceError::Forbidden);
        }
        if self.repo.used_beyond_draft(id).await? {
            return Err(MailingServiceError::TemplateInUse);
        }

        if let Some(subject) = input.subject {
            let subject = subject.trim();
            if subject.is_empty() {
                return Err(MailingServiceError::EmptySubject);
            }
            template.subject = subject.to_owned();
        }
        if let Some(body) = input.body {
            template.body = body;
        }

        if !self.repo.update(&template).await? {
            return Err(MailingServiceError::TemplateNotFound);
        }
        Ok(template)
    }
}

// ── GetTemplate ──────────────────────────────────────────────────────────────

pub struct GetTemplateUseCase<R: TemplateRepository> {
    pub repo: R,
}

impl<R: TemplateRepository> GetTemplateUseCase<R> {
    pub async fn execute(
        &self,
        actor: Actor,
        id: Uuid,
    ) -> Result<MessageTemplate, MailingServiceError> {
        let template = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(MailingServiceError::TemplateNotFound)?;
        if !actor.can_act_on(template.owner_id, Action::ViewAll) {
            return Err(MailingServiceError::Forbidden);
        }
        Ok(template)
    }
}

// ── ListTemplates ────────────────────────────────────────────────────────────

pub struct ListTemplatesUseCase<R: TemplateRepository> {
    pub repo: R,
}

impl<R: TemplateRepository> ListTemplatesUseCase<R> {
    pub async fn execute(
        &self,
        actor: Actor,
        page: PageRequest,
    ) -> Result<Vec<MessageTemplate>, MailingServiceError> {
        self.repo.list(actor.owner_scope(), page).await
    }
}
