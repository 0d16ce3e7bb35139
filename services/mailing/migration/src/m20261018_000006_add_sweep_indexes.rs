use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Launch and send selection.
        manager
            .create_index(
                Index::create()
                    .table(MailingJobs::Table)
                    .col(MailingJobs::Status)
                    .col(MailingJobs::WindowStart)
                    .name("idx_mailing_jobs_status_window_start")
                    .to_owned(),
            )
            .await?;
        // Completion selection.
        manager
            .create_index(
                Index::create()
                    .table(MailingJobs::Table)
                    .col(MailingJobs::Status)
                    .col(MailingJobs::WindowEnd)
                    .name("idx_mailing_jobs_status_window_end")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(DeliveryAttempts::Table)
                    .col(DeliveryAttempts::MailingJobId)
                    .col(DeliveryAttempts::AttemptedAt)
                    .name("idx_delivery_attempts_mailing_job_id_attempted_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_delivery_attempts_mailing_job_id_attempted_at")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_mailing_jobs_status_window_end")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_mailing_jobs_status_window_start")
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum MailingJobs {
    Table,
    Status,
    WindowStart,
    WindowEnd,
}

#[derive(Iden)]
enum DeliveryAttempts {
    Table,
    MailingJobId,
    AttemptedAt,
}
