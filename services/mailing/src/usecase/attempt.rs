use uuid::Uuid;

use courier_domain::account::{Action, Actor};
use courier_domain::pagination::PageRequest;

use crate::domain::repository::{AttemptRepository, MailingRepository};
use crate::domain::types::DeliveryAttempt;
use crate::error::MailingServiceError;

// ── ListAttempts ─────────────────────────────────────────────────────────────

pub struct ListAttemptsUseCase<M: MailingRepository, A: AttemptRepository> {
    pub mailings: M,
    pub attempts: A,
}

impl<M: MailingRepository, A: AttemptRepository> ListAttemptsUseCase<M, A> {
    /// Attempts for one mailing, newest first.
    pub async fn execute(
        &self,
        actor: Actor,
        mailing_job_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<DeliveryAttempt>, MailingServiceError> {
        let job = self
            .mailings
            .find_by_id(mailing_job_id)
            .await?
            .ok_or(MailingServiceError::MailingNotFound)?;
        if !actor.can_act_on(job.owner_id, Action::ViewAll) {
            return Err(MailingServiceError::Forbidden);
        }
        self.attempts.list_by_mailing(mailing_job_id, page).await
    }
}
