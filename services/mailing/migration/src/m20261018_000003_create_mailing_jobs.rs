use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MailingJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MailingJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MailingJobs::WindowStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MailingJobs::WindowEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MailingJobs::Periodicity)
                            .string()
                            .not_null()
                            .default("daily"),
                    )
                    .col(
                        ColumnDef::new(MailingJobs::Status)
                            .string()
                            .not_null()
                            .default("created"),
                    )
                    .col(
                        ColumnDef::new(MailingJobs::MessageTemplateId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MailingJobs::OwnerId).uuid())
                    .col(ColumnDef::new(MailingJobs::ClaimId).uuid())
                    .col(ColumnDef::new(MailingJobs::ClaimedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(MailingJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MailingJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(
                        Expr::col(MailingJobs::WindowStart).lte(Expr::col(MailingJobs::WindowEnd)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MailingJobs::Table, MailingJobs::MessageTemplateId)
                            .to(MessageTemplates::Table, MessageTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MailingJobs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MailingJobs {
    Table,
    Id,
    WindowStart,
    WindowEnd,
    Periodicity,
    Status,
    MessageTemplateId,
    OwnerId,
    ClaimId,
    ClaimedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MessageTemplates {
    Table,
    Id,
}
