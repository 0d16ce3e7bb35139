use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use courier_domain::account::{Action, Actor};
use courier_domain::mailing::{MailingStatus, Periodicity};
use courier_domain::pagination::PageRequest;

use crate::domain::repository::{MailingRepository, RecipientRepository, TemplateRepository};
use crate::domain::types::{MailingJob, MailingJobDetail, MessageTemplate};
use crate::error::MailingServiceError;

/// A window may be empty (`start == end`) but never inverted.
pub fn validate_window(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<(), MailingServiceError> {
    if window_start > window_end {
        return Err(MailingServiceError::InvalidWindow);
    }
    Ok(())
}

async fn find_visible<M: MailingRepository>(
    mailings: &M,
    actor: Actor,
    id: Uuid,
    any: Action,
) -> Result<MailingJob, MailingServiceError> {
    let job = mailings
        .find_by_id(id)
        .await?
        .ok_or(MailingServiceError::MailingNotFound)?;
    if !actor.can_act_on(job.owner_id, any) {
        return Err(MailingServiceError::Forbidden);
    }
    Ok(job)
}

async fn visible_template<T: TemplateRepository>(
    templates: &T,
    actor: Actor,
    id: Uuid,
) -> Result<MessageTemplate, MailingServiceError> {
    let template = templates
        .find_by_id(id)
        .await?
        .ok_or(MailingServiceError::TemplateNotFound)?;
    if !actor.can_act_on(template.owner_id, Action::ViewAll) {
        return Err(MailingServiceError::Forbidden);
    }
    Ok(template)
}

/// Deduplicated ids, each naming a recipient the actor can see.
async fn visible_recipient_ids<R: RecipientRepository>(
    recipients: &R,
    actor: Actor,
    ids: Vec<Uuid>,
) -> Result<Vec<Uuid>, MailingServiceError> {
    let mut seen = HashSet::new();
    let ids: Vec<Uuid> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
    let found = recipients.find_by_ids(&ids).await?;
    if found.len() != ids.len() {
        return Err(MailingServiceError::RecipientNotFound);
    }
    if found
        .iter()
        .any(|r| !actor.can_act_on(r.owner_id, Action::ViewAll))
    {
        return Err(MailingServiceError::Forbidden);
    }
    Ok(ids)
}

// ── CreateMailing ────────────────────────────────────────────────────────────

pub struct CreateMailingInput {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub periodicity: Periodicity,
    pub message_template_id: Uuid,
    pub recipient_ids: Vec<Uuid>,
}

pub struct CreateMailingUseCase<M, T, R>
where
    M: MailingRepository,
    T: TemplateRepository,
    R: RecipientRepository,
{
    pub mailings: M,
    pub templates: T,
    pub recipients: R,
}

impl<M, T, R> CreateMailingUseCase<M, T, R>
where
    M: MailingRepository,
    T: TemplateRepository,
    R: RecipientRepository,
{
    pub async fn execute(
        &self,
        actor: Actor,
        input: CreateMailingInput,
    ) -> Result<MailingJobDetail, MailingServiceError> {
        if !actor.can(Action::ManageOwn) {
            return Err(MailingServiceError::Forbidden);
        }
        validate_window(input.window_start, input.window_end)?;

        let template =
            visible_template(&self.templates, actor, input.message_template_id).await?;
        let recipient_ids =
            visible_recipient_ids(&self.recipients, actor, input.recipient_ids).await?;

        let now = Utc::now();
        let job = MailingJob {
            id: Uuid::now_v7(),
            window_start: input.window_start,
            window_end: input.window_end,
            periodicity: input.periodicity,
            status: MailingStatus::Created,
            message_template_id: template.id,
            owner_id: Some(actor.account_id),
            created_at: now,
            updated_at: now,
        };
        self.mailings.create(&job, &recipient_ids).await?;
        Ok(MailingJobDetail { job, recipient_ids })
    }
}

// ── UpdateMailing ────────────────────────────────────────────────────────────

/// Fields left `None` keep their current value.
#[derive(Default)]
pub struct UpdateMailingInput {
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub periodicity: Option<Periodicity>,
    pub message_template_id: Option<Uuid>,
    /// Replaces the whole recipient list.
    pub recipient_ids: Option<Vec<Uuid>>,
}

pub struct UpdateMailingUseCase<M, T, R>
where
    M: MailingRepository,
    T: TemplateRepository,
    R: RecipientRepository,
{
    pub mailings: M,
    pub templates: T,
    pub recipients: R,
}

impl<M, T, R> UpdateMailingUseCase<M, T, R>
where
    M: MailingRepository,
    T: TemplateRepository,
    R: RecipientRepository,
{
    /// Only `created` jobs are editable; the sweep owns everything after launch.
    pub async fn execute(
        &self,
        actor: Actor,
        id: Uuid,
        input: UpdateMailingInput,
    ) -> Result<MailingJobDetail, MailingServiceError> {
        let mut job = find_visible(&self.mailings, actor, id, Action::EditAny).await?;
        if job.status != MailingStatus::Created {
            return Err(MailingServiceError::MailingNotEditable);
        }

        job.window_start = input.window_start.unwrap_or(job.window_start);
        job.window_end = input.window_end.unwrap_or(job.window_end);
        validate_window(job.window_start, job.window_end)?;
        job.periodicity = input.periodicity.unwrap_or(job.periodicity);

        if let Some(template_id) = input.message_template_id {
            job.message_template_id = visible_template(&self.templates, actor, template_id)
                .await?
                .id;
        }
        let recipient_ids = match input.recipient_ids {
            Some(ids) => Some(visible_recipient_ids(&self.recipients, actor, ids).await?),
            None => None,
        };

        job.updated_at = Utc::now();
        // The sweep may have launched it since it was read.
        if !self
            .mailings
            .update_draft(&job, recipient_ids.as_deref())
            .await?
        {
            return Err(MailingServiceError::MailingNotEditable);
        }

        let recipient_ids = match recipient_ids {
            Some(ids) => ids,
            None => self.mailings.recipient_ids(id).await?,
        };
        Ok(MailingJobDetail { job, recipient_ids })
    }
}

// ── GetMailing ───────────────────────────────────────────────────────────────

pub struct GetMailingUseCase<M: MailingRepository> {
    pub repo: M,
}

impl<M: MailingRepository> GetMailingUseCase<M> {
    pub async fn execute(
        &self,
        actor: Actor,
        id: Uuid,
    ) -> Result<MailingJobDetail, MailingServiceError> {
        let job = find_visible(&self.repo, actor, id, Action::ViewAll).await?;
        let recipient_ids = self.repo.recipient_ids(id).await?;
        Ok(MailingJobDetail { job, recipient_ids })
    }
}

// ── ListMailings ─────────────────────────────────────────────────────────────

pub struct ListMailingsUseCase<M: MailingRepository> {
    pub repo: M,
}

impl<M: MailingRepository> ListMailingsUseCase<M> {
    pub async fn execute(
        &self,
        actor: Actor,
        status: Option<MailingStatus>,
        page: PageRequest,
    ) -> Result<Vec<MailingJob>, MailingServiceError> {
        self.repo.list(actor.owner_scope(), status, page).await
    }
}

// ── DeleteMailing ────────────────────────────────────────────────────────────

pub struct DeleteMailingUseCase<M: MailingRepository> {
    pub repo: M,
}

impl<M: MailingRepository> DeleteMailingUseCase<M> {
    pub async fn execute(&self, actor: Actor, id: Uuid) -> Result<(), MailingServiceError> {
        find_visible(&self.repo, actor, id, Action::EditAny).await?;
        if !self.repo.delete(id).await? {
            return Err(MailingServiceError::MailingNotFound);
        }
        Ok(())
    }
}

// ── Deactivate / Activate ────────────────────────────────────────────────────

pub struct SetMailingActiveUseCase<M: MailingRepository> {
    pub repo: M,
}

impl<M: MailingRepository> SetMailingActiveUseCase<M> {
    /// `active = false` moves `launched → deactivated`; `true` moves it back.
    pub async fn execute(
        &self,
        actor: Actor,
        id: Uuid,
        active: bool,
    ) -> Result<MailingJob, MailingServiceError> {
        let (from, to) = if active {
            (MailingStatus::Deactivated, MailingStatus::Launched)
        } else {
            (MailingStatus::Launched, MailingStatus::Deactivated)
        };

        let mut job = find_visible(&self.repo, actor, id, Action::ToggleAnyMailing).await?;
        if job.status != from || !from.operator_can_transition_to(to) {
            return Err(MailingServiceError::InvalidStatusTransition);
        }

        let now = Utc::now();
        // A sweep may have completed the job since it was read.
        if !self.repo.transition(id, from, to, now).await? {
            return Err(MailingServiceError::InvalidStatusTransition);
        }
        tracing::info!(mailing_job_id = %id, from = %from, to = %to, actor = %actor.account_id, "mailing toggled");

        job.status = to;
        job.updated_at = now;
        Ok(job)
    }
}
