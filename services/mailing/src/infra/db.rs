use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, RelationTrait, Select, SqlErr, TransactionTrait, UpdateMany,
    sea_query::{Expr, SimpleExpr},
};
use uuid::Uuid;

use courier_core::sea_ext::ApplyPage;
use courier_domain::mailing::{AttemptOutcome, MailingStatus, Periodicity};
use courier_domain::pagination::PageRequest;
use courier_mailing_schema::{
    delivery_attempts, mailing_job_recipients, mailing_jobs, message_templates, recipients,
};

use crate::domain::repository::{
    AttemptRepository, MailingRepository, RecipientRepository, ReportRepository, SweepStore,
    TemplateRepository,
};
use crate::domain::types::{
    DeliveryAttempt, Dispatch, MailingJob, MailingReport, MessageTemplate, Recipient,
};
use crate::error::MailingServiceError;

// ── Recipient repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipientRepository {
    pub db: DatabaseConnection,
}

impl RecipientRepository for DbRecipientRepository {
    async fn create(&self, recipient: &Recipient) -> Result<(), MailingServiceError> {
        let result = recipients::ActiveModel {
            id: Set(recipient.id),
            email: Set(recipient.email.clone()),
            name: Set(recipient.name.clone()),
            note: Set(recipient.note.clone()),
            is_active: Set(recipient.is_active),
            owner_id: Set(recipient.owner_id),
            created_at: Set(recipient.created_at),
            updated_at: Set(recipient.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(MailingServiceError::RecipientAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create recipient").into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipient>, MailingServiceError> {
        let model = recipients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipient by id")?;
        Ok(model.map(recipient_from_model))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Recipient>, MailingServiceError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = recipients::Entity::find()
            .filter(recipients::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find recipients by ids")?;
        Ok(models.into_iter().map(recipient_from_model).collect())
    }

    async fn list(
        &self,
        owner: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Recipient>, MailingServiceError> {
        let models = recipients::Entity::find()
            .apply_if(owner, |q, owner| {
                q.filter(recipients::Column::OwnerId.eq(owner))
            })
            .order_by_desc(recipients::Column::CreatedAt)
            .apply_page(page)
            .all(&self.db)
            .await
            .context("list recipients")?;
        Ok(models.into_iter().map(recipient_from_model).collect())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, MailingServiceError> {
        let result = recipients::Entity::update_many()
            .col_expr(recipients::Column::IsActive, Expr::value(is_active))
            .col_expr(recipients::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(recipients::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set recipient active")?;
        Ok(result.rows_affected > 0)
    }

    async fn update(&self, recipient: &Recipient) -> Result<bool, MailingServiceError> {
        let result = recipients::Entity::update_many()
            .col_expr(recipients::Column::Email, Expr::value(recipient.email.clone()))
            .col_expr(recipients::Column::Name, Expr::value(recipient.name.clone()))
            .col_expr(recipients::Column::Note, Expr::value(recipient.note.clone()))
            .col_expr(recipients::Column::UpdatedAt, Expr::value(recipient.updated_at))
            .filter(recipients::Column::Id.eq(recipient.id))
            .exec(&self.db)
            .await;
        match result {
            Ok(result) => Ok(result.rows_affected > 0),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(MailingServiceError::RecipientAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("update recipient").into()),
        }
    }
}

fn recipient_from_model(model: recipients::Model) -> Recipient {
    Recipient {
        id: model.id,
        email: model.email,
        name: model.name,
        note: model.note,
        is_active: model.is_active,
        owner_id: model.owner_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Template repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTemplateRepository {
    pub db: DatabaseConnection,
}

impl TemplateRepository for DbTemplateRepository {
    async fn create(&self, template: &MessageTemplate) -> Result<(), MailingServiceError> {
        message_templates::ActiveModel {
            id: Set(template.id),
            subject: Set(template.subject.clone()),
            body: Set(template.body.clone()),
            owner_id: Set(template.owner_id),
            created_at: Set(template.created_at),
        }
        .insert(&self.db)
        .await
        .context("create message template")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MessageTemplate>, MailingServiceError> {
        let model = message_templates::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find message template by id")?;
        Ok(model.map(template_from_model))
    }

    async fn list(
        &self,
        owner: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<MessageTemplate>, MailingServiceError> {
        let models = message_templates::Entity::find()
            .apply_if(owner, |q, owner| {
                q.filter(message_templates::Column::OwnerId.eq(owner))
            })
            .order_by_desc(message_templates::Column::CreatedAt)
            .apply_page(page)
            .all(&self.db)
            .await
            .context("list message templates")?;
        Ok(models.into_iter().map(template_from_model).collect())
    }

    async fn update(&self, template: &MessageTemplate) -> Result<bool, MailingServiceError> {
        let result = message_templates::Entity::update_many()
            .col_expr(
                message_templates::Column::Subject,
                Expr::value(template.subject.clone()),
            )
            .col_expr(
                message_templates::Column::Body,
                Expr::value(template.body.clone()),
            )
            .filter(message_templates::Column::Id.eq(template.id))
            .exec(&self.db)
            .await
            .context("update message template")?;
        Ok(result.rows_affected > 0)
    }

    async fn used_beyond_draft(&self, id: Uuid) -> Result<bool, MailingServiceError> {
        let count = mailing_jobs::Entity::find()
            .filter(mailing_jobs::Column::MessageTemplateId.eq(id))
            .filter(
                mailing_jobs::Column::Status
                    .is_not_in(MailingStatus::Created.stored_names().iter().copied()),
            )
            .count(&self.db)
            .await
            .context("count mailings using template")?;
        Ok(count > 0)
    }
}

fn template_from_model(model: message_templates::Model) -> MessageTemplate {
    MessageTemplate {
        id: model.id,
        subject: model.subject,
        body: model.body,
        owner_id: model.owner_id,
        created_at: model.created_at,
    }
}

// ── Mailing repository ───────────────────────────────────────────────────────

/// Backs both the operator surface and the dispatch sweep.
#[derive(Clone)]
pub struct DbMailingRepository {
    pub db: DatabaseConnection,
}

impl MailingRepository for DbMailingRepository {
    async fn create(
        &self,
        job: &MailingJob,
        recipient_ids: &[Uuid],
    ) -> Result<(), MailingServiceError> {
        let job = job.clone();
        let recipient_ids = recipient_ids.to_vec();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    mailing_jobs::ActiveModel {
                        id: Set(job.id),
                        window_start: Set(job.window_start),
                        window_end: Set(job.window_end),
                        periodicity: Set(job.periodicity.as_str().to_owned()),
                        status: Set(job.status.as_str().to_owned()),
                        message_template_id: Set(job.message_template_id),
                        owner_id: Set(job.owner_id),
                        claim_id: Set(None),
                        claimed_at: Set(None),
                        created_at: Set(job.created_at),
                        updated_at: Set(job.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    if !recipient_ids.is_empty() {
                        mailing_job_recipients::Entity::insert_many(recipient_ids.into_iter().map(
                            |recipient_id| mailing_job_recipients::ActiveModel {
                                mailing_job_id: Set(job.id),
                                recipient_id: Set(recipient_id),
                            },
                        ))
                        .exec_without_returning(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("create mailing with recipients")?;
        Ok(())
    }

    async fn update_draft(
        &self,
        job: &MailingJob,
        recipient_ids: Option<&[Uuid]>,
    ) -> Result<bool, MailingServiceError> {
        let job = job.clone();
        let recipient_ids = recipient_ids.map(<[Uuid]>::to_vec);
        let updated = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let result = draft_update(&job).exec(txn).await?;
                    if result.rows_affected != 1 {
                        return Ok(false);
                    }

                    if let Some(recipient_ids) = recipient_ids {
                        mailing_job_recipients::Entity::delete_many()
                            .filter(mailing_job_recipients::Column::MailingJobId.eq(job.id))
                            .exec(txn)
                            .await?;
                        if !recipient_ids.is_empty() {
                            mailing_job_recipients::Entity::insert_many(
                                recipient_ids.into_iter().map(|recipient_id| {
                                    mailing_job_recipients::ActiveModel {
                                        mailing_job_id: Set(job.id),
                                        recipient_id: Set(recipient_id),
                                    }
                                }),
                            )
                            .exec_without_returning(txn)
                            .await?;
                        }
                    }
                    Ok(true)
                })
            })
            .await
            .context("update draft mailing")?;
        Ok(updated)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MailingJob>, MailingServiceError> {
        let model = mailing_jobs::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find mailing by id")?;
        model.map(mailing_from_model).transpose()
    }

    async fn recipient_ids(&self, id: Uuid) -> Result<Vec<Uuid>, MailingServiceError> {
        let ids = mailing_job_recipients::Entity::find()
            .select_only()
            .column(mailing_job_recipients::Column::RecipientId)
            .filter(mailing_job_recipients::Column::MailingJobId.eq(id))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("list mailing recipient ids")?;
        Ok(ids)
    }

    async fn list(
        &self,
        owner: Option<Uuid>,
        status: Option<MailingStatus>,
        page: PageRequest,
    ) -> Result<Vec<MailingJob>, MailingServiceError> {
        let models = mailing_jobs::Entity::find()
            .apply_if(owner, |q, owner| {
                q.filter(mailing_jobs::Column::OwnerId.eq(owner))
            })
            .apply_if(status, |q, status| q.filter(status_in(status)))
            .order_by_desc(mailing_jobs::Column::CreatedAt)
            .apply_page(page)
            .all(&self.db)
            .await
            .context("list mailings")?;
        models.into_iter().map(mailing_from_model).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MailingServiceError> {
        let result = mailing_jobs::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete mailing")?;
        Ok(result.rows_affected > 0)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: MailingStatus,
        to: MailingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError> {
        transition_status(&self.db, id, from, to, now).await
    }
}

impl SweepStore for DbMailingRepository {
    async fn find_due_to_launch(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, MailingServiceError> {
        let ids = due_to_launch_query(now)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("find mailings due to launch")?;
        Ok(ids)
    }

    async fn find_sendable(
        &self,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, MailingServiceError> {
        let ids = sendable_query(now, stale_before)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("find sendable mailings")?;
        Ok(ids)
    }

    async fn find_due_to_complete(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, MailingServiceError> {
        let ids = due_to_complete_query(now)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("find mailings due to complete")?;
        Ok(ids)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: MailingStatus,
        to: MailingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError> {
        transition_status(&self.db, id, from, to, now).await
    }

    async fn claim(
        &self,
        id: Uuid,
        token: Uuid,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError> {
        let result = claim_update(id, token, now, stale_before)
            .exec(&self.db)
            .await
            .context("claim mailing")?;
        Ok(result.rows_affected == 1)
    }

    async fn renew(
        &self,
        id: Uuid,
        token: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, MailingServiceError> {
        let result = renew_update(id, token, now)
            .exec(&self.db)
            .await
            .context("renew mailing claim")?;
        Ok(result.rows_affected == 1)
    }

    async fn release(&self, id: Uuid, token: Uuid) -> Result<(), MailingServiceError> {
        release_update(id, token)
            .exec(&self.db)
            .await
            .context("release mailing claim")?;
        Ok(())
    }

    async fn load_dispatch(&self, id: Uuid) -> Result<Option<Dispatch>, MailingServiceError> {
        let Some(job) = mailing_jobs::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("load mailing for dispatch")?
        else {
            return Ok(None);
        };
        let Some(template) = message_templates::Entity::find_by_id(job.message_template_id)
            .one(&self.db)
            .await
            .context("load template for dispatch")?
        else {
            return Ok(None);
        };
        let recipients = recipients::Entity::find()
            .join(
                JoinType::InnerJoin,
                recipients::Relation::MailingJobRecipients.def(),
            )
            .filter(mailing_job_recipients::Column::MailingJobId.eq(id))
            .filter(recipients::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .context("load recipients for dispatch")?;

        Ok(Some(Dispatch {
            job: mailing_from_model(job)?,
            template: template_from_model(template),
            recipients: recipients.into_iter().map(recipient_from_model).collect(),
        }))
    }
}

// ── Mailing queries ──────────────────────────────────────────────────────────

/// Matches every stored spelling of `status`, including the legacy `started`.
fn status_in(status: MailingStatus) -> SimpleExpr {
    mailing_jobs::Column::Status.is_in(status.stored_names().iter().copied())
}

/// No claim, or a claim taken before `stale_before`.
fn claim_free(stale_before: DateTime<Utc>) -> Condition {
    Condition::any()
        .add(mailing_jobs::Column::ClaimId.is_null())
        .add(mailing_jobs::Column::ClaimedAt.lt(stale_before))
}

fn job_ids() -> Select<mailing_jobs::Entity> {
    mailing_jobs::Entity::find()
        .select_only()
        .column(mailing_jobs::Column::Id)
}

fn due_to_launch_query(now: DateTime<Utc>) -> Select<mailing_jobs::Entity> {
    job_ids()
        .filter(status_in(MailingStatus::Created))
        .filter(mailing_jobs::Column::WindowStart.lte(now))
}

fn sendable_query(
    now: DateTime<Utc>,
    stale_before: DateTime<Utc>,
) -> Select<mailing_jobs::Entity> {
    job_ids()
        .filter(status_in(MailingStatus::Launched))
        .filter(mailing_jobs::Column::WindowStart.lte(now))
        .filter(mailing_jobs::Column::WindowEnd.gt(now))
        .filter(claim_free(stale_before))
}

fn due_to_complete_query(now: DateTime<Utc>) -> Select<mailing_jobs::Entity> {
    job_ids()
        .filter(status_in(MailingStatus::Launched))
        .filter(mailing_jobs::Column::WindowEnd.lte(now))
}

fn claim_update(
    id: Uuid,
    token: Uuid,
    now: DateTime<Utc>,
    stale_before: DateTime<Utc>,
) -> UpdateMany<mailing_jobs::Entity> {
    mailing_jobs::Entity::update_many()
        .col_expr(mailing_jobs::Column::ClaimId, Expr::value(token))
        .col_expr(mailing_jobs::Column::ClaimedAt, Expr::value(now))
        .filter(mailing_jobs::Column::Id.eq(id))
        .filter(status_in(MailingStatus::Launched))
        .filter(claim_free(stale_before))
}

fn renew_update(id: Uuid, token: Uuid, now: DateTime<Utc>) -> UpdateMany<mailing_jobs::Entity> {
    mailing_jobs::Entity::update_many()
        .col_expr(mailing_jobs::Column::ClaimedAt, Expr::value(now))
        .filter(mailing_jobs::Column::Id.eq(id))
        .filter(mailing_jobs::Column::ClaimId.eq(token))
}

fn release_update(id: Uuid, token: Uuid) -> UpdateMany<mailing_jobs::Entity> {
    mailing_jobs::Entity::update_many()
        .col_expr(mailing_jobs::Column::ClaimId, Expr::value(Option::<Uuid>::None))
        .col_expr(
            mailing_jobs::Column::ClaimedAt,
            Expr::value(Option::<DateTime<Utc>>::None),
        )
        .filter(mailing_jobs::Column::Id.eq(id))
        .filter(mailing_jobs::Column::ClaimId.eq(token))
}

fn transition_update(
    id: Uuid,
    from: MailingStatus,
    to: MailingStatus,
    now: DateTime<Utc>,
) -> UpdateMany<mailing_jobs::Entity> {
    mailing_jobs::Entity::update_many()
        .col_expr(mailing_jobs::Column::Status, Expr::value(to.as_str()))
        .col_expr(mailing_jobs::Column::UpdatedAt, Expr::value(now))
        .filter(mailing_jobs::Column::Id.eq(id))
        .filter(status_in(from))
}

/// Rewrites the editable fields of a job still in `created`.
fn draft_update(job: &MailingJob) -> UpdateMany<mailing_jobs::Entity> {
    mailing_jobs::Entity::update_many()
        .col_expr(mailing_jobs::Column::WindowStart, Expr::value(job.window_start))
        .col_expr(mailing_jobs::Column::WindowEnd, Expr::value(job.window_end))
        .col_expr(
            mailing_jobs::Column::Periodicity,
            Expr::value(job.periodicity.as_str()),
        )
        .col_expr(
            mailing_jobs::Column::MessageTemplateId,
            Expr::value(job.message_template_id),
        )
        .col_expr(mailing_jobs::Column::UpdatedAt, Expr::value(job.updated_at))
        .filter(mailing_jobs::Column::Id.eq(job.id))
        .filter(status_in(MailingStatus::Created))
}

async fn transition_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: MailingStatus,
    to: MailingStatus,
    now: DateTime<Utc>,
) -> Result<bool, MailingServiceError> {
    let result = transition_update(id, from, to, now)
        .exec(db)
        .await
        .with_context(|| format!("transition mailing {from} -> {to}"))?;
    Ok(result.rows_affected == 1)
}

fn mailing_from_model(model: mailing_jobs::Model) -> Result<MailingJob, MailingServiceError> {
    Ok(MailingJob {
        id: model.id,
        window_start: model.window_start,
        window_end: model.window_end,
        periodicity: model
            .periodicity
            .parse::<Periodicity>()
            .with_context(|| format!("mailing {}", model.id))?,
        status: model
            .status
            .parse::<MailingStatus>()
            .with_context(|| format!("mailing {}", model.id))?,
        message_template_id: model.message_template_id,
        owner_id: model.owner_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Attempt repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttemptRepository {
    pub db: DatabaseConnection,
}

impl AttemptRepository for DbAttemptRepository {
    async fn record(&self, attempt: &DeliveryAttempt) -> Result<(), MailingServiceError> {
        delivery_attempts::ActiveModel {
            id: Set(attempt.id),
            mailing_job_id: Set(attempt.mailing_job_id),
            recipient_id: Set(attempt.recipient_id),
            recipient_email: Set(attempt.recipient_email.clone()),
            attempted_at: Set(attempt.attempted_at),
            outcome: Set(attempt.outcome.as_str().to_owned()),
            response: Set(attempt.response.clone()),
        }
        .insert(&self.db)
        .await
        .context("record delivery attempt")?;
        Ok(())
    }

    async fn list_by_mailing(
        &self,
        mailing_job_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<DeliveryAttempt>, MailingServiceError> {
        let models = delivery_attempts::Entity::find()
            .filter(delivery_attempts::Column::MailingJobId.eq(mailing_job_id))
            .order_by_desc(delivery_attempts::Column::AttemptedAt)
            .apply_page(page)
            .all(&self.db)
            .await
            .context("list delivery attempts")?;
        models.into_iter().map(attempt_from_model).collect()
    }
}

fn attempt_from_model(model: delivery_attempts::Model) -> Result<DeliveryAttempt, MailingServiceError> {
    Ok(DeliveryAttempt {
        id: model.id,
        mailing_job_id: model.mailing_job_id,
        recipient_id: model.recipient_id,
        recipient_email: model.recipient_email,
        attempted_at: model.attempted_at,
        outcome: model
            .outcome
            .parse::<AttemptOutcome>()
            .with_context(|| format!("delivery attempt {}", model.id))?,
        response: model.response,
    })
}

// ── Report repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReportRepository {
    pub db: DatabaseConnection,
}

impl DbReportRepository {
    async fn count_attempts(
        &self,
        owner: Option<Uuid>,
        outcome: AttemptOutcome,
    ) -> Result<u64, MailingServiceError> {
        let count = delivery_attempts::Entity::find()
            .join(
                JoinType::InnerJoin,
                delivery_attempts::Relation::MailingJob.def(),
            )
            .filter(delivery_attempts::Column::Outcome.eq(outcome.as_str()))
            .apply_if(owner, |q, owner| {
                q.filter(mailing_jobs::Column::OwnerId.eq(owner))
            })
            .count(&self.db)
            .await
            .context("count delivery attempts")?;
        Ok(count)
    }
}

impl ReportRepository for DbReportRepository {
    async fn summary(&self, owner: Option<Uuid>) -> Result<MailingReport, MailingServiceError> {
        let mailings = || {
            mailing_jobs::Entity::find().apply_if(owner, |q, owner| {
                q.filter(mailing_jobs::Column::OwnerId.eq(owner))
            })
        };
        let total = mailings()
            .count(&self.db)
            .await
            .context("count mailings")?;
        let launched = mailings()
            .filter(status_in(MailingStatus::Launched))
            .count(&self.db)
            .await
            .context("count launched mailings")?;
        let recipients = recipients::Entity::find()
            .apply_if(owner, |q, owner| {
                q.filter(recipients::Column::OwnerId.eq(owner))
            })
            .count(&self.db)
            .await
            .context("count recipients")?;

        Ok(MailingReport {
            mailings: total,
            launched_mailings: launched,
            recipients,
            attempts_succeeded: self.count_attempts(owner, AttemptOutcome::Success).await?,
            attempts_failed: self.count_attempts(owner, AttemptOutcome::Failure).await?,
        })
    }
}
