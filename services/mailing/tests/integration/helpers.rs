use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use courier_domain::mailing::{AttemptOutcome, MailingStatus, Periodicity};
use courier_domain::pagination::PageRequest;
use courier_mailing::domain::repository::{
    AttemptRepository, MailTransport, MailingRepository, RecipientRepository, ReportRepository,
    SweepStore, TemplateRepository, TransportError,
};
use courier_mailing::domain::types::{
    DeliveryAttempt, Dispatch, MailingJob, MailingReport, MessageTemplate, OutgoingMail, Recipient,
};
use courier_mailing::error::MailingServiceError;
use courier_mailing::usecase::sweep::{SweepSettings, SweepUseCase};

// ── In-memory store ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StoredJob {
    pub job: MailingJob,
    pub recipient_ids: Vec<Uuid>,
    pub claim: Option<(Uuid, DateTime<Utc>)>,
}

#[derive(Debug, Default)]
pub struct World {
    pub jobs: Vec<StoredJob>,
    pub templates: Vec<MessageTemplate>,
    pub recipients: Vec<Recipient>,
    pub attempts: Vec<DeliveryAttempt>,
    /// Jobs whose claim is taken by someone else between scan and claim.
    pub contested: HashSet<Uuid>,
    /// Jobs whose attempts cannot be written.
    pub unwritable: HashSet<Uuid>,
    /// The next this many attempt writes fail, whatever their job.
    pub failing_writes: usize,
    /// Successful claim renewals.
    pub renewals: usize,
    /// Every scan query fails.
    pub scans_fail: bool,
}

/// Shared in-memory backing for every repository trait. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MockDb {
    pub world: Arc<Mutex<World>>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_template(&self, template: MessageTemplate) {
        self.world.lock().unwrap().templates.push(template);
    }

    pub fn add_recipient(&self, recipient: Recipient) {
        self.world.lock().unwrap().recipients.push(recipient);
    }

    pub fn add_job(&self, job: MailingJob, recipient_ids: Vec<Uuid>) {
        self.world.lock().unwrap().jobs.push(StoredJob {
            job,
            recipient_ids,
            claim: None,
        });
    }

    pub fn set_claim(&self, id: Uuid, claim: Option<(Uuid, DateTime<Utc>)>) {
        let mut world = self.world.lock().unwrap();
        if let Some(stored) = world.jobs.iter_mut().find(|s| s.job.id == id) {
            stored.claim = claim;
        }
    }

    pub fn status_of(&self, id: Uuid) -> Option<MailingStatus> {
        self.world
            .lock()
            .unwrap()
            .jobs
            .iter()
            .find(|s| s.job.id == id)
            .map(|s| s.job.status)
    }

    pub fn claim_of(&self, id: Uuid) -> Option<(Uuid, DateTime<Utc>)> {
        self.world
            .lock()
            .unwrap()
            .jobs
            .iter()
            .find(|s| s.job.id == id)
            .and_then(|s| s.claim)
    }

    pub fn attempts_for(&self, id: Uuid) -> Vec<DeliveryAttempt> {
        self.world
            .lock()
            .unwrap()
            .attempts
            .iter()
            .filter(|a| a.mailing_job_id == id)
            .cloned()
            .collect()
    }

    pub fn attempt_count(&self) -> usize {
        self.world.lock().unwrap().attempts.len()
    }

    fn scan<F>(&self, keep: F) -> Result<Vec<Uuid>, MailingServiceError>
    where
        F: Fn(&StoredJob) -> bool,
    {
        let world = self.world.lock().unwrap();
        if world.scans_fail {
            return Err(anyhow::anyhow!("connection reset").into());
        }
        Ok(world
            .jobs
            .iter()
            .filter(|s| keep(s))
            .map(|s| s.job.id)
            .collect())
    }

    fn cas(
        &self,
        id: Uuid,
        from: MailingStatus,
        to: MailingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        match world
            .jobs
            .iter_mut()
            .find(|s| s.job.id == id && s.job.status == from)
        {
            Some(stored) => {
                stored.job.status = to;
                stored.job.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn claim_free(stored: &StoredJob, stale_before: DateTime<Utc>) -> bool {
    stored
        .claim
        .is_none_or(|(_, claimed_at)| claimed_at < stale_before)
}

impl SweepStore for MockDb {
    async fn find_due_to_launch(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, MailingServiceError> {
        self.scan(|s| s.job.status == MailingStatus::Created && s.job.window_start <= now)
    }

    async fn find_sendable(
        &self,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, MailingServiceError> {
        self.scan(|s| {
            s.job.status == MailingStatus::Launched
                && s.job.is_window_open(now)
                && claim_free(s, stale_before)
        })
    }

    async fn find_due_to_complete(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, MailingServiceError> {
        self.scan(|s| s.job.status == MailingStatus::Launched && s.job.window_end <= now)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: MailingStatus,
        to: MailingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError> {
        self.cas(id, from, to, now)
    }

    async fn claim(
        &self,
        id: Uuid,
        token: Uuid,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        if world.contested.contains(&id) {
            return Ok(false);
        }
        match world.jobs.iter_mut().find(|s| {
            s.job.id == id && s.job.status == MailingStatus::Launched && claim_free(s, stale_before)
        }) {
            Some(stored) => {
                stored.claim = Some((token, now));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn renew(
        &self,
        id: Uuid,
        token: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        let renewed = match world
            .jobs
            .iter_mut()
            .find(|s| s.job.id == id && s.claim.is_some_and(|(t, _)| t == token))
        {
            Some(stored) => {
                stored.claim = Some((token, now));
                true
            }
            None => false,
        };
        if renewed {
            world.renewals += 1;
        }
        Ok(renewed)
    }

    async fn release(&self, id: Uuid, token: Uuid) -> Result<(), MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        if let Some(stored) = world
            .jobs
            .iter_mut()
            .find(|s| s.job.id == id && s.claim.is_some_and(|(t, _)| t == token))
        {
            stored.claim = None;
        }
        Ok(())
    }

    async fn load_dispatch(&self, id: Uuid) -> Result<Option<Dispatch>, MailingServiceError> {
        let world = self.world.lock().unwrap();
        let Some(stored) = world.jobs.iter().find(|s| s.job.id == id) else {
            return Ok(None);
        };
        let Some(template) = world
            .templates
            .iter()
            .find(|t| t.id == stored.job.message_template_id)
        else {
            return Ok(None);
        };
        let recipients = world
            .recipients
            .iter()
            .filter(|r| r.is_active && stored.recipient_ids.contains(&r.id))
            .cloned()
            .collect();
        Ok(Some(Dispatch {
            job: stored.job.clone(),
            template: template.clone(),
            recipients,
        }))
    }
}

impl MailingRepository for MockDb {
    async fn create(
        &self,
        job: &MailingJob,
        recipient_ids: &[Uuid],
    ) -> Result<(), MailingServiceError> {
        self.add_job(job.clone(), recipient_ids.to_vec());
        Ok(())
    }

    async fn update_draft(
        &self,
        job: &MailingJob,
        recipient_ids: Option<&[Uuid]>,
    ) -> Result<bool, MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        let Some(stored) = world
            .jobs
            .iter_mut()
            .find(|s| s.job.id == job.id && s.job.status == MailingStatus::Created)
        else {
            return Ok(false);
        };
        stored.job = MailingJob {
            status: stored.job.status,
            ..job.clone()
        };
        if let Some(ids) = recipient_ids {
            stored.recipient_ids = ids.to_vec();
        }
        Ok(true)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MailingJob>, MailingServiceError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .jobs
            .iter()
            .find(|s| s.job.id == id)
            .map(|s| s.job.clone()))
    }

    async fn recipient_ids(&self, id: Uuid) -> Result<Vec<Uuid>, MailingServiceError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .jobs
            .iter()
            .find(|s| s.job.id == id)
            .map(|s| s.recipient_ids.clone())
            .unwrap_or_default())
    }

    async fn list(
        &self,
        owner: Option<Uuid>,
        status: Option<MailingStatus>,
        page: PageRequest,
    ) -> Result<Vec<MailingJob>, MailingServiceError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .jobs
            .iter()
            .filter(|s| owner.is_none() || s.job.owner_id == owner)
            .filter(|s| status.is_none_or(|status| s.job.status == status))
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|s| s.job.clone())
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        let before = world.jobs.len();
        world.jobs.retain(|s| s.job.id != id);
        world.attempts.retain(|a| a.mailing_job_id != id);
        Ok(world.jobs.len() < before)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: MailingStatus,
        to: MailingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError> {
        self.cas(id, from, to, now)
    }
}

impl RecipientRepository for MockDb {
    async fn create(&self, recipient: &Recipient) -> Result<(), MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        if world.recipients.iter().any(|r| r.email == recipient.email) {
            return Err(MailingServiceError::RecipientAlreadyExists);
        }
        world.recipients.push(recipient.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipient>, MailingServiceError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .recipients
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Recipient>, MailingServiceError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .recipients
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        owner: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Recipient>, MailingServiceError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .recipients
            .iter()
            .filter(|r| owner.is_none() || r.owner_id == owner)
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        Ok(match world.recipients.iter_mut().find(|r| r.id == id) {
            Some(r) => {
                r.is_active = is_active;
                true
            }
            None => false,
        })
    }

    async fn update(&self, recipient: &Recipient) -> Result<bool, MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        if world
            .recipients
            .iter()
            .any(|r| r.id != recipient.id && r.email == recipient.email)
        {
            return Err(MailingServiceError::RecipientAlreadyExists);
        }
        Ok(match world.recipients.iter_mut().find(|r| r.id == recipient.id) {
            Some(r) => {
                *r = recipient.clone();
                true
            }
            None => false,
        })
    }
}

impl TemplateRepository for MockDb {
    async fn create(&self, template: &MessageTemplate) -> Result<(), MailingServiceError> {
        self.add_template(template.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MessageTemplate>, MailingServiceError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn list(
        &self,
        owner: Option<Uuid>,
        _page: PageRequest,
    ) -> Result<Vec<MessageTemplate>, MailingServiceError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .templates
            .iter()
            .filter(|t| owner.is_none() || t.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn update(&self, template: &MessageTemplate) -> Result<bool, MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        Ok(match world.templates.iter_mut().find(|t| t.id == template.id) {
            Some(t) => {
                *t = template.clone();
                true
            }
            None => false,
        })
    }

    async fn used_beyond_draft(&self, id: Uuid) -> Result<bool, MailingServiceError> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .jobs
            .iter()
            .any(|s| s.job.message_template_id == id && s.job.status != MailingStatus::Created))
    }
}

impl AttemptRepository for MockDb {
    async fn record(&self, attempt: &DeliveryAttempt) -> Result<(), MailingServiceError> {
        let mut world = self.world.lock().unwrap();
        if world.unwritable.contains(&attempt.mailing_job_id) {
            return Err(anyhow::anyhow!("disk full").into());
        }
        if world.failing_writes > 0 {
            world.failing_writes -= 1;
            return Err(anyhow::anyhow!("deadlock detected").into());
        }
        world.attempts.push(attempt.clone());
        Ok(())
    }

    async fn list_by_mailing(
        &self,
        mailing_job_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<DeliveryAttempt>, MailingServiceError> {
        let mut attempts = self.attempts_for(mailing_job_id);
        attempts.sort_by(|a, b| b.attempted_at.cmp(&a.attempted_at));
        Ok(attempts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

impl ReportRepository for MockDb {
    async fn summary(&self, owner: Option<Uuid>) -> Result<MailingReport, MailingServiceError> {
        let world = self.world.lock().unwrap();
        let owned: Vec<&StoredJob> = world
            .jobs
            .iter()
            .filter(|s| owner.is_none() || s.job.owner_id == owner)
            .collect();
        let count_attempts = |outcome: AttemptOutcome| {
            world
                .attempts
                .iter()
                .filter(|a| a.outcome == outcome)
                .filter(|a| owned.iter().any(|s| s.job.id == a.mailing_job_id))
                .count() as u64
        };
        Ok(MailingReport {
            mailings: owned.len() as u64,
            launched_mailings: owned
                .iter()
                .filter(|s| s.job.status == MailingStatus::Launched)
                .count() as u64,
            recipients: world
                .recipients
                .iter()
                .filter(|r| owner.is_none() || r.owner_id == owner)
                .count() as u64,
            attempts_succeeded: count_attempts(AttemptOutcome::Success),
            attempts_failed: count_attempts(AttemptOutcome::Failure),
        })
    }
}

// ── Transports ───────────────────────────────────────────────────────────────

/// Accepts every message and remembers it.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub sent: Arc<Mutex<Vec<OutgoingMail>>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<String, TransportError> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok("250 2.0.0 OK queued".to_owned())
    }
}

/// Rejects every message, like a relay that is down.
pub struct FailingTransport;

impl MailTransport for FailingTransport {
    async fn send(&self, _mail: &OutgoingMail) -> Result<String, TransportError> {
        Err(TransportError::Smtp("connection refused".to_owned()))
    }
}

/// Rejects messages addressed to `bad`, accepts the rest.
pub struct SelectiveTransport {
    pub bad: String,
}

impl MailTransport for SelectiveTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<String, TransportError> {
        if mail.to.iter().any(|to| *to == self.bad) {
            return Err(TransportError::Smtp("550 mailbox unavailable".to_owned()));
        }
        Ok("250 OK".to_owned())
    }
}

/// Never answers.
pub struct HangingTransport;

impl MailTransport for HangingTransport {
    async fn send(&self, _mail: &OutgoingMail) -> Result<String, TransportError> {
        std::future::pending().await
    }
}

/// Takes `delay` per message and tracks the peak number of concurrent sends.
#[derive(Clone)]
pub struct SlowTransport {
    pub delay: Duration,
    pub in_flight: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
    pub sent: Arc<AtomicUsize>,
}

impl SlowTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            sent: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MailTransport for SlowTransport {
    async fn send(&self, _mail: &OutgoingMail) -> Result<String, TransportError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok("250 OK".to_owned())
    }
}

/// Takes `delay` per message, then hands the job's claim to another sweeper.
pub struct ClaimStealingTransport {
    pub db: MockDb,
    pub job_id: Uuid,
    pub delay: Duration,
    pub sent: Arc<AtomicUsize>,
}

impl MailTransport for ClaimStealingTransport {
    async fn send(&self, _mail: &OutgoingMail) -> Result<String, TransportError> {
        tokio::time::sleep(self.delay).await;
        self.sent.fetch_add(1, Ordering::SeqCst);
        self.db
            .set_claim(self.job_id, Some((Uuid::now_v7(), Utc::now())));
        Ok("250 OK".to_owned())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn settings() -> SweepSettings {
    SweepSettings {
        from_email: "Courier <noreply@example.com>".to_owned(),
        concurrency: 4,
        send_timeout: Duration::from_secs(5),
        claim_lease: Duration::from_secs(900),
    }
}

pub fn sweeper<T: MailTransport>(db: &MockDb, transport: T) -> SweepUseCase<MockDb, MockDb, T> {
    SweepUseCase {
        store: db.clone(),
        attempts: db.clone(),
        transport,
        settings: settings(),
    }
}

pub fn test_recipient(email: &str, owner: Option<Uuid>) -> Recipient {
    let now = Utc::now();
    Recipient {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        name: "Test Recipient".to_owned(),
        note: None,
        is_active: true,
        owner_id: owner,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_template(owner: Option<Uuid>) -> MessageTemplate {
    MessageTemplate {
        id: Uuid::now_v7(),
        subject: "Weekly digest".to_owned(),
        body: "Here is what happened this week.".to_owned(),
        owner_id: owner,
        created_at: Utc::now(),
    }
}

pub fn test_job(
    status: MailingStatus,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    template_id: Uuid,
    owner: Option<Uuid>,
) -> MailingJob {
    let created_at = window_start - TimeDelta::days(1);
    MailingJob {
        id: Uuid::now_v7(),
        window_start,
        window_end,
        periodicity: Periodicity::Daily,
        status,
        message_template_id: template_id,
        owner_id: owner,
        created_at,
        updated_at: created_at,
    }
}

/// Seed a template, `emails.len()` active recipients and one job using them.
pub fn seed_job(
    db: &MockDb,
    status: MailingStatus,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    emails: &[&str],
) -> MailingJob {
    let template = test_template(None);
    let recipient_ids = emails
        .iter()
        .map(|email| {
            let recipient = test_recipient(email, None);
            let id = recipient.id;
            db.add_recipient(recipient);
            id
        })
        .collect();
    let job = test_job(status, window_start, window_end, template.id, None);
    db.add_template(template);
    db.add_job(job.clone(), recipient_ids);
    job
}
