#![allow(async_fn_in_trait)]

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use courier_domain::mailing::MailingStatus;
use courier_domain::pagination::PageRequest;

use crate::domain::types::{
    DeliveryAttempt, Dispatch, MailingJob, MailingReport, MessageTemplate, OutgoingMail, Recipient,
};
use crate::error::MailingServiceError;

/// Repository for recipients.
pub trait RecipientRepository: Send + Sync {
    /// Fails with `RecipientAlreadyExists` when the email is taken.
    async fn create(&self, recipient: &Recipient) -> Result<(), MailingServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipient>, MailingServiceError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Recipient>, MailingServiceError>;

    /// `owner = None` lists every recipient.
    async fn list(
        &self,
        owner: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Recipient>, MailingServiceError>;

    /// Returns `true` if a row was updated.
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, MailingServiceError>;

    /// Overwrite email, name and note. Fails with `RecipientAlreadyExists` when the
    /// new email is taken.
    async fn update(&self, recipient: &Recipient) -> Result<bool, MailingServiceError>;
}

/// Repository for message templates.
pub trait TemplateRepository: Send + Sync {
    async fn create(&self, template: &MessageTemplate) -> Result<(), MailingServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MessageTemplate>, MailingServiceError>;

    async fn list(
        &self,
        owner: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<MessageTemplate>, MailingServiceError>;

    async fn update(&self, template: &MessageTemplate) -> Result<bool, MailingServiceError>;

    /// Whether any mailing past `created` references the template.
    async fn used_beyond_draft(&self, id: Uuid) -> Result<bool, MailingServiceError>;
}

/// Operator-side access to mailing jobs.
pub trait MailingRepository: Send + Sync {
    /// Insert the job and its recipient links atomically.
    async fn create(
        &self,
        job: &MailingJob,
        recipient_ids: &[Uuid],
    ) -> Result<(), MailingServiceError>;

    /// Rewrite window, periodicity and template of a job still in `created`, and
    /// replace its recipient links when `recipient_ids` is given. Returns `false`
    /// if the job has left `created`.
    async fn update_draft(
        &self,
        job: &MailingJob,
        recipient_ids: Option<&[Uuid]>,
    ) -> Result<bool, MailingServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MailingJob>, MailingServiceError>;

    async fn recipient_ids(&self, id: Uuid) -> Result<Vec<Uuid>, MailingServiceError>;

    async fn list(
        &self,
        owner: Option<Uuid>,
        status: Option<MailingStatus>,
        page: PageRequest,
    ) -> Result<Vec<MailingJob>, MailingServiceError>;

    /// Returns `true` if a row was deleted. Attempts and links cascade.
    async fn delete(&self, id: Uuid) -> Result<bool, MailingServiceError>;

    /// Compare-and-swap on status. Returns `false` if the job was not in `from`.
    async fn transition(
        &self,
        id: Uuid,
        from: MailingStatus,
        to: MailingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError>;
}

/// Storage operations used by the dispatch sweep.
///
/// Every mutation is conditional: a `false` return means another writer got there
/// first and the caller must leave the job alone.
pub trait SweepStore: Send + Sync {
    /// Ids of `created` jobs with `window_start <= now`.
    async fn find_due_to_launch(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, MailingServiceError>;

    /// Ids of `launched` jobs with an open window and no claim newer than `stale_before`.
    async fn find_sendable(
        &self,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, MailingServiceError>;

    /// Ids of `launched` jobs with `window_end <= now`.
    async fn find_due_to_complete(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, MailingServiceError>;

    async fn transition(
        &self,
        id: Uuid,
        from: MailingStatus,
        to: MailingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError>;

    /// Take the sweep claim on a `launched` job that is unclaimed or whose claim
    /// predates `stale_before`.
    async fn claim(
        &self,
        id: Uuid,
        token: Uuid,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError>;

    /// Push the claim's `claimed_at` to `now`. Returns `false` if `token` no
    /// longer owns the claim.
    async fn renew(
        &self,
        id: Uuid,
        token: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError>;

    /// Drop the claim if `token` still owns it.
    async fn release(&self, id: Uuid, token: Uuid) -> Result<(), MailingServiceError>;

    /// `None` if the job or its template no longer exists.
    async fn load_dispatch(&self, id: Uuid) -> Result<Option<Dispatch>, MailingServiceError>;
}

/// Append-only delivery attempt log.
pub trait AttemptRepository: Send + Sync {
    async fn record(&self, attempt: &DeliveryAttempt) -> Result<(), MailingServiceError>;

    /// Newest first.
    async fn list_by_mailing(
        &self,
        mailing_job_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<DeliveryAttempt>, MailingServiceError>;
}

/// Aggregate counters for the dashboard.
pub trait ReportRepository: Send + Sync {
    async fn summary(&self, owner: Option<Uuid>) -> Result<MailingReport, MailingServiceError>;
}

/// Errors surfaced by a [`MailTransport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("SMTP error: {0}")]
    Smtp(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Outbound mail port. One call per message; implementations do not retry.
pub trait MailTransport: Send + Sync {
    /// Returns the server's confirmation text.
    async fn send(&self, mail: &OutgoingMail) -> Result<String, TransportError>;
}
