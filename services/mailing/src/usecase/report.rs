use courier_domain::account::Actor;

use crate::domain::repository::ReportRepository;
use crate::domain::types::MailingReport;
use crate::error::MailingServiceError;

pub struct GetReportUseCase<R: ReportRepository> {
    pub repo: R,
}

impl<R: ReportRepository> GetReportUseCase<R> {
    /// Counters over the actor's own records, or every record for supervisors.
    pub async fn execute(&self, actor: Actor) -> Result<MailingReport, MailingServiceError> {
        self.repo.summary(actor.owner_scope()).await
    }
}
