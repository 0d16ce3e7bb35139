//! Mailing dispatch sweep.
//!
//! One pass, evaluated against a single `now`:
//!
//! 1. `created` jobs whose window has opened move to `launched`.
//! 2. `launched` jobs with an open window are claimed, delivered to every active
//!    recipient and released. Each delivery leaves one [`DeliveryAttempt`].
//! 3. `launched` jobs whose window has closed move to `completed`.
//!
//! Every status change is a compare-and-swap and every delivery runs under a
//! per-job claim, renewed while deliveries run, so overlapping passes (scheduler,
//! CLI, HTTP) never double-send.

#![allow(async_fn_in_trait)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use courier_domain::mailing::{AttemptOutcome, MailingStatus};

use crate::domain::repository::{AttemptRepository, MailTransport, SweepStore, TransportError};
use crate::domain::types::{
    DeliveryAttempt, Dispatch, MailingJob, MessageTemplate, OutgoingMail, Recipient, SweepReport,
};
use crate::error::MailingServiceError;

/// Tuning for a sweep pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSettings {
    /// Sender address on every message.
    pub from_email: String,
    /// Maximum in-flight deliveries for one mailing.
    pub concurrency: usize,
    /// Upper bound on a single transport call.
    pub send_timeout: Duration,
    /// Claims older than this are treated as abandoned. Renewed at half-life
    /// while deliveries run.
    pub claim_lease: Duration,
}

impl SweepSettings {
    /// Claims taken before the returned instant are stale at `now`.
    pub fn stale_before(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        TimeDelta::from_std(self.claim_lease)
            .ok()
            .and_then(|lease| now.checked_sub_signed(lease))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Anything that can run one sweep pass. The scheduler, the `sweep` subcommand and
/// `POST /sweeps` all go through this.
pub trait Sweeper: Send + Sync {
    async fn sweep(&self) -> Result<SweepReport, MailingServiceError>;
}

// ── Sweep ────────────────────────────────────────────────────────────────────

pub struct SweepUseCase<S: SweepStore, A: AttemptRepository, T: MailTransport> {
    pub store: S,
    pub attempts: A,
    pub transport: T,
    pub settings: SweepSettings,
}

enum JobOutcome {
    Delivered { succeeded: u64, failed: u64 },
    Skipped,
}

impl<S, A, T> SweepUseCase<S, A, T>
where
    S: SweepStore,
    A: AttemptRepository,
    T: MailTransport,
{
    /// Run one pass as of `now`.
    ///
    /// Errors from the launch and completion scans abort the pass. Failures while
    /// dispatching a single mailing are logged and counted as skipped.
    pub async fn execute_at(&self, now: DateTime<Utc>) -> Result<SweepReport, MailingServiceError> {
        let mut report = SweepReport::default();

        for id in self.store.find_due_to_launch(now).await? {
            if self
                .advance(id, MailingStatus::Created, MailingStatus::Launched, now)
                .await
            {
                report.launched += 1;
            }
        }

        let stale_before = self.settings.stale_before(now);
        for id in self.store.find_sendable(now, stale_before).await? {
            match self.dispatch_job(id, now, stale_before).await {
                Ok(JobOutcome::Delivered { succeeded, failed }) => {
                    report.processed += 1;
                    report.attempts_succeeded += succeeded;
                    report.attempts_failed += failed;
                }
                Ok(JobOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    error!(mailing_job_id = %id, error = %e, "mailing dispatch failed");
                    report.skipped += 1;
                }
            }
        }

        for id in self.store.find_due_to_complete(now).await? {
            if self
                .advance(id, MailingStatus::Launched, MailingStatus::Completed, now)
                .await
            {
                report.completed += 1;
            }
        }

        info!(
            launched = report.launched,
            processed = report.processed,
            skipped = report.skipped,
            completed = report.completed,
            attempts_succeeded = report.attempts_succeeded,
            attempts_failed = report.attempts_failed,
            "sweep finished"
        );
        Ok(report)
    }

    /// Returns `true` only if this pass made the transition.
    async fn advance(
        &self,
        id: Uuid,
        from: MailingStatus,
        to: MailingStatus,
        now: DateTime<Utc>,
    ) -> bool {
        if !from.sweep_can_transition_to(to) {
            error!(mailing_job_id = %id, from = %from, to = %to, "sweep cannot make this transition");
            return false;
        }
        match self.store.transition(id, from, to, now).await {
            Ok(true) => {
                info!(mailing_job_id = %id, from = %from, to = %to, "mailing status changed");
                true
            }
            Ok(false) => {
                debug!(mailing_job_id = %id, from = %from, to = %to, "status already changed elsewhere");
                false
            }
            Err(e) => {
                error!(mailing_job_id = %id, from = %from, to = %to, error = %e, "status transition failed");
                false
            }
        }
    }

    async fn dispatch_job(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<JobOutcome, MailingServiceError> {
        let token = Uuid::now_v7();
        if !self.store.claim(id, token, now, stale_before).await? {
            debug!(mailing_job_id = %id, "mailing claimed by another sweep");
            return Ok(JobOutcome::Skipped);
        }

        let outcome = self.deliver_claimed(id, token, now).await;

        if let Err(e) = self.store.release(id, token).await {
            warn!(mailing_job_id = %id, error = %e, "failed to release claim; it will lapse after the lease");
        }
        outcome
    }

    /// Deliver to every active recipient while holding the claim `token`.
    ///
    /// The claim is renewed once half the lease has elapsed. If renewal finds the
    /// claim taken over, deliveries not yet started are dropped. A failed attempt
    /// write does not stop the stream; it fails the job only after every delivery
    /// in flight has resolved.
    async fn deliver_claimed(
        &self,
        id: Uuid,
        token: Uuid,
        now: DateTime<Utc>,
    ) -> Result<JobOutcome, MailingServiceError> {
        let Some(Dispatch {
            job,
            template,
            recipients,
        }) = self.store.load_dispatch(id).await?
        else {
            warn!(mailing_job_id = %id, "mailing or its template vanished before dispatch");
            return Ok(JobOutcome::Skipped);
        };

        if job.status != MailingStatus::Launched || !job.is_window_open(now) {
            debug!(mailing_job_id = %id, status = %job.status, "mailing no longer sendable");
            return Ok(JobOutcome::Skipped);
        }

        let mut seen = HashSet::new();
        let recipients: Vec<Recipient> = recipients
            .into_iter()
            .filter(|r| r.is_active && seen.insert(r.id))
            .collect();

        let claim_lost = AtomicBool::new(false);
        let (job, template, claim_lost) = (&job, &template, &claim_lost);
        let mut deliveries = stream::iter(recipients)
            .map(|recipient| async move {
                if claim_lost.load(Ordering::Acquire) {
                    return None;
                }
                Some(self.deliver(job, template, &recipient).await)
            })
            .buffer_unordered(self.settings.concurrency.max(1));

        let renew_every = self.settings.claim_lease / 2;
        let mut renewed_at = Instant::now();
        let (mut succeeded, mut failed, mut dropped) = (0u64, 0u64, 0u64);
        let mut write_error = None;
        let mut unrecorded = 0u64;

        while let Some(attempt) = deliveries.next().await {
            let Some(attempt) = attempt else {
                dropped += 1;
                continue;
            };

            match self.attempts.record(&attempt).await {
                Ok(()) => match attempt.outcome {
                    AttemptOutcome::Success => succeeded += 1,
                    AttemptOutcome::Failure => failed += 1,
                },
                Err(e) => {
                    error!(
                        mailing_job_id = %id,
                        recipient_email = %attempt.recipient_email,
                        error = %e,
                        "failed to record delivery attempt"
                    );
                    unrecorded += 1;
                    if write_error.is_none() {
                        write_error = Some(e);
                    }
                }
            }

            if renewed_at.elapsed() >= renew_every && !claim_lost.load(Ordering::Acquire) {
                match self.store.renew(id, token, Utc::now()).await {
                    Ok(true) => renewed_at = Instant::now(),
                    Ok(false) => {
                        warn!(mailing_job_id = %id, "claim taken over; dropping remaining deliveries");
                        claim_lost.store(true, Ordering::Release);
                    }
                    Err(e) => warn!(mailing_job_id = %id, error = %e, "failed to renew claim"),
                }
            }
        }

        if let Some(e) = write_error {
            error!(mailing_job_id = %id, succeeded, failed, unrecorded, "mailing delivered with unrecorded attempts");
            return Err(e);
        }

        debug!(mailing_job_id = %id, succeeded, failed, dropped, "mailing delivered");
        Ok(JobOutcome::Delivered { succeeded, failed })
    }

    async fn deliver(
        &self,
        job: &MailingJob,
        template: &MessageTemplate,
        recipient: &Recipient,
    ) -> DeliveryAttempt {
        let mail = OutgoingMail {
            from: self.settings.from_email.clone(),
            to: vec![recipient.email.clone()],
            subject: template.subject.clone(),
            body: template.body.clone(),
        };

        let timeout = self.settings.send_timeout;
        let result = match tokio::time::timeout(timeout, self.transport.send(&mail)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(timeout)),
        };

        let (outcome, response) = match result {
            Ok(confirmation) => (AttemptOutcome::Success, Some(confirmation)),
            Err(e) => {
                warn!(
                    mailing_job_id = %job.id,
                    recipient_id = %recipient.id,
                    error = %e,
                    "delivery failed"
                );
                (AttemptOutcome::Failure, Some(e.to_string()))
            }
        };

        DeliveryAttempt {
            id: Uuid::now_v7(),
            mailing_job_id: job.id,
            recipient_id: Some(recipient.id),
            recipient_email: recipient.email.clone(),
            attempted_at: Utc::now(),
            outcome,
            response,
        }
    }
}

impl<S, A, T> Sweeper for SweepUseCase<S, A, T>
where
    S: SweepStore,
    A: AttemptRepository,
    T: MailTransport,
{
    async fn sweep(&self) -> Result<SweepReport, MailingServiceError> {
        self.execute_at(Utc::now()).await
    }
}
