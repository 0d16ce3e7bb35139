use chrono::Utc;
use uuid::Uuid;

use courier_domain::account::{Action, Actor};
use courier_domain::pagination::PageRequest;

use crate::domain::repository::RecipientRepository;
use crate::domain::types::Recipient;
use crate::error::MailingServiceError;

/// Trimmed address if it parses as a mailbox address.
pub fn normalize_email(email: &str) -> Result<String, MailingServiceError> {
    let email = email.trim();
    email
        .parse::<lettre::Address>()
        .map(|_| email.to_owned())
        .map_err(|_| MailingServiceError::InvalidEmail)
}

// ── CreateRecipient ──────────────────────────────────────────────────────────

pub struct CreateRecipientInput {
    pub email: String,
    pub name: String,
    pub note: Option<String>,
}

pub struct CreateRecipientUseCase<R: RecipientRepository> {
    pub repo: R,
}

impl<R: RecipientRepository> CreateRecipientUseCase<R> {
    pub async fn execute(
        &self,
        actor: Actor,
        input: CreateRecipientInput,
    ) -> Result<Recipient, MailingServiceError> {
        if !actor.can(Action::ManageOwn) {
            return Err(MailingServiceError::Forbidden);
        }
        let email = normalize_email(&input.email)?;
        let now = Utc::now();
        let recipient = Recipient {
            id: Uuid::now_v7(),
            email,
            name: input.name.trim().to_owned(),
            note: input.note.filter(|n| !n.trim().is_empty()),
            is_active: true,
            owner_id: Some(actor.account_id),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&recipient).await?;
        Ok(recipient)
    }
}

// ── UpdateRecipient ──────────────────────────────────────────────────────────

/// Fields left `None` keep their value. A blank `note` clears it.
#[derive(Default)]
pub struct UpdateRecipientInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub note: Option<String>,
}

pub struct UpdateRecipientUseCase<R: RecipientRepository> {
    pub repo: R,
}

impl<R: RecipientRepository> UpdateRecipientUseCase<R> {
    pub async fn execute(
        &self,
        actor: Actor,
        id: Uuid,
        input: UpdateRecipientInput,
    ) -> Result<Recipient, MailingServiceError> {
        let mut recipient = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(MailingServiceError::RecipientNotFound)?;
        if !actor.can_act_on(recipient.owner_id, Action::EditAny) {
            return Err(MailingServiceError::Forbidden);
        }

        if let Some(email) = input.email {
            recipient.email = normalize_email(&email)?;
        }
        if let Some(name) = input.name {
            recipient.name = name.trim().to_owned();
        }
        if let Some(note) = input.note {
            recipient.note = Some(note).filter(|n| !n.trim().is_empty());
        }
        recipient.updated_at = Utc::now();

        if !self.repo.update(&recipient).await? {
            return Err(MailingServiceError::RecipientNotFound);
        }
        Ok(recipient)
    }
}

// ── GetRecipient ─────────────────────────────────────────────────────────────

pub struct GetRecipientUseCase<R: RecipientRepository> {
    pub repo: R,
}

impl<R: RecipientRepository> GetRecipientUseCase<R> {
    pub async fn execute(&self, actor: Actor, id: Uuid) -> Result<Recipient, MailingServiceError> {
        let recipient = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(MailingServiceError::RecipientNotFound)?;
        if !actor.can_act_on(recipient.owner_id, Action::ViewAll) {
            return Err(MailingServiceError::Forbidden);
        }
        Ok(recipient)
    }
}

// ── ListRecipients ───────────────────────────────────────────────────────────

pub struct ListRecipientsUseCase<R: RecipientRepository> {
    pub repo: R,
}

impl<R: RecipientRepository> ListRecipientsUseCase<R> {
    pub async fn execute(
        &self,
        actor: Actor,
        page: PageRequest,
    ) -> Result<Vec<Recipient>, MailingServiceError> {
        self.repo.list(actor.owner_scope(), page).await
    }
}

// ── Block / Unblock ──────────────────────────────────────────────────────────

pub struct SetRecipientActiveUseCase<R: RecipientRepository> {
    pub repo: R,
}

impl<R: RecipientRepository> SetRecipientActiveUseCase<R> {
    /// `is_active = false` blocks the recipient from every future sweep.
    pub async fn execute(
        &self,
        actor: Actor,
        id: Uuid,
        is_active: bool,
    ) -> Result<Recipient, MailingServiceError> {
        let mut recipient = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(MailingServiceError::RecipientNotFound)?;
        if !actor.can_act_on(recipient.owner_id, Action::BlockAnyRecipient) {
            return Err(MailingServiceError::Forbidden);
        }
        if !self.repo.set_active(id, is_active).await? {
            return Err(MailingServiceError::RecipientNotFound);
        }
        recipient.is_active = is_active;
        recipient.updated_at = Utc::now();
        Ok(recipient)
    }
}
