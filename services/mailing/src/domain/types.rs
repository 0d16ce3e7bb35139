use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use courier_domain::mailing::{AttemptOutcome, MailingStatus, Periodicity};

/// Address that mailings are delivered to.
#[derive(Debug, Clone)]
pub struct Recipient {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub note: Option<String>,
    /// `false` once blocked; blocked recipients are skipped by the sweep.
    pub is_active: bool,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subject and body sent by a mailing.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub id: Uuid,
    pub subject: String,
    pub body: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A scheduled mailing.
#[derive(Debug, Clone)]
pub struct MailingJob {
    pub id: Uuid,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub periodicity: Periodicity,
    pub status: MailingStatus,
    pub message_template_id: Uuid,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MailingJob {
    /// `window_start <= now < window_end`
    pub fn is_window_open(&self, now: DateTime<Utc>) -> bool {
        self.window_start <= now && now < self.window_end
    }
}

/// A mailing with its recipient links.
#[derive(Debug, Clone)]
pub struct MailingJobDetail {
    pub job: MailingJob,
    pub recipient_ids: Vec<Uuid>,
}

/// Record of one delivery to one recipient.
#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    pub id: Uuid,
    pub mailing_job_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub recipient_email: String,
    pub attempted_at: DateTime<Utc>,
    pub outcome: AttemptOutcome,
    /// Transport confirmation on success, error text on failure.
    pub response: Option<String>,
}

/// Everything a sweep needs to deliver one claimed mailing.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub job: MailingJob,
    pub template: MessageTemplate,
    /// Active recipients only.
    pub recipients: Vec<Recipient>,
}

/// Message handed to a [`MailTransport`](crate::domain::repository::MailTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MailingReport {
    pub mailings: u64,
    pub launched_mailings: u64,
    pub recipients: u64,
    pub attempts_succeeded: u64,
    pub attempts_failed: u64,
}

/// Outcome counts of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// `created → launched` transitions won by this pass.
    pub launched: u64,
    /// Mailings whose recipients were delivered to.
    pub processed: u64,
    /// Sendable mailings not delivered: claimed elsewhere, vanished, or failed.
    pub skipped: u64,
    /// `launched → completed` transitions won by this pass.
    pub completed: u64,
    pub attempts_succeeded: u64,
    pub attempts_failed: u64,
}
