use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeliveryAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryAttempts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeliveryAttempts::MailingJobId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryAttempts::RecipientId).uuid())
                    .col(
                        ColumnDef::new(DeliveryAttempts::RecipientEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryAttempts::AttemptedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryAttempts::Outcome).string().not_null())
                    .col(ColumnDef::new(DeliveryAttempts::Response).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(DeliveryAttempts::Table, DeliveryAttempts::MailingJobId)
                            .to(MailingJobs::Table, MailingJobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // Attempts outlive the recipient they were sent to.
                    .foreign_key(
                        ForeignKey::create()
                            .from(DeliveryAttempts::Table, DeliveryAttempts::RecipientId)
                            .to(Recipients::Table, Recipients::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryAttempts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DeliveryAttempts {
    Table,
    Id,
    MailingJobId,
    RecipientId,
    RecipientEmail,
    AttemptedAt,
    Outcome,
    Response,
}

#[derive(Iden)]
enum MailingJobs {
    Table,
    Id,
}

#[derive(Iden)]
enum Recipients {
    Table,
    Id,
}
