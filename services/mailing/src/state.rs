use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAttemptRepository, DbMailingRepository, DbRecipientRepository, DbReportRepository,
    DbTemplateRepository,
};
use crate::infra::smtp::SmtpMailTransport;
use crate::usecase::sweep::{SweepSettings, SweepUseCase};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub transport: SmtpMailTransport,
    pub sweep: SweepSettings,
}

impl AppState {
    pub fn recipient_repo(&self) -> DbRecipientRepository {
        DbRecipientRepository {
            db: self.db.clone(),
        }
    }

    pub fn template_repo(&self) -> DbTemplateRepository {
        DbTemplateRepository {
            db: self.db.clone(),
        }
    }

    pub fn mailing_repo(&self) -> DbMailingRepository {
        DbMailingRepository {
            db: self.db.clone(),
        }
    }

    pub fn attempt_repo(&self) -> DbAttemptRepository {
        DbAttemptRepository {
            db: self.db.clone(),
        }
    }

    pub fn report_repo(&self) -> DbReportRepository {
        DbReportRepository {
            db: self.db.clone(),
        }
    }

    pub fn sweeper(
        &self,
    ) -> SweepUseCase<DbMailingRepository, DbAttemptRepository, SmtpMailTransport> {
        SweepUseCase {
            store: self.mailing_repo(),
            attempts: self.attempt_repo(),
            transport: self.transport.clone(),
            settings: self.sweep.clone(),
        }
    }
}
